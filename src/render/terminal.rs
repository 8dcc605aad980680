//! Terminal renderer
//!
//! Paints a [`TimerView`] either as a multi-line dashboard (`Full`) or a
//! single status line (`Compact`). On an interactive terminal each frame
//! overwrites the previous one in place; otherwise a frame is appended only
//! when its visible text changes, which keeps piped output readable.

use std::io::{self, Write};
use std::sync::Arc;

use console::{Style, StyledObject};

use super::RenderSink;
use super::format::{format_clock, progress_bar};
use crate::phase::{PhaseKind, RunStatus, Schedule, TimerView};

const BAR_WIDTH: usize = 30;
const COMPACT_BAR_WIDTH: usize = 16;

/// Terminal layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Title, phase list, progress bars, status line
    Full,
    /// One line
    Compact,
}

/// Renders timer views as styled text.
pub struct TerminalRenderer {
    out: Box<dyn Write + Send>,
    schedule: Arc<Schedule>,
    layout: Layout,
    colors: bool,
    interactive: bool,
    frame: u64,
    lines_drawn: usize,
    last_text: Option<String>,
}

impl std::fmt::Debug for TerminalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("schedule", &self.schedule.name())
            .field("layout", &self.layout)
            .field("colors", &self.colors)
            .field("interactive", &self.interactive)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl TerminalRenderer {
    /// Creates a renderer writing to `out`.
    ///
    /// `interactive` enables in-place redraws with ANSI cursor movement.
    #[must_use]
    pub fn new(
        out: Box<dyn Write + Send>,
        schedule: Arc<Schedule>,
        layout: Layout,
        colors: bool,
        interactive: bool,
    ) -> Self {
        Self {
            out,
            schedule,
            layout,
            colors,
            interactive,
            frame: 0,
            lines_drawn: 0,
            last_text: None,
        }
    }

    fn paint<D>(&self, value: D, style: &Style) -> StyledObject<D> {
        style.apply_to(value).force_styling(self.colors)
    }

    /// Alternates on every rendered frame.
    const fn flash_on(&self) -> bool {
        self.frame % 2 == 0
    }

    fn phase_style(&self, view: &TimerView) -> Style {
        match view.status {
            RunStatus::Running if view.warning_active => {
                if self.flash_on() {
                    Style::new().yellow().bold()
                } else {
                    Style::new().yellow()
                }
            }
            RunStatus::Running => match view.phase_kind {
                Some(PhaseKind::Closing) if self.flash_on() => Style::new().red().bold(),
                Some(PhaseKind::Closing) => Style::new().red().dim(),
                _ => Style::new().green().bold(),
            },
            RunStatus::PausedForBoss => Style::new().blue().bold(),
            RunStatus::Completed => Style::new().cyan(),
            RunStatus::Idle => Style::new().dim(),
        }
    }

    fn status_line(&self, view: &TimerView) -> String {
        let (text, style) = match view.status {
            RunStatus::Idle => ("Trigger to start the timer".to_string(), Style::new().dim()),
            RunStatus::PausedForBoss => (
                "Boss fight! Trigger when ready to resume.".to_string(),
                Style::new().blue().bold(),
            ),
            RunStatus::Completed => (
                "Run complete. Trigger to start again.".to_string(),
                Style::new().cyan(),
            ),
            RunStatus::Running if view.warning_active => (
                format!("Ring closing in {}s!", view.phase_remaining.as_secs() + 1),
                Style::new().yellow().bold(),
            ),
            RunStatus::Running => (
                match &view.next_phase_label {
                    Some(next) => format!("Next: {next} in {}", format_clock(view.phase_remaining)),
                    None => format!("Final phase ends in {}", format_clock(view.phase_remaining)),
                },
                Style::new(),
            ),
        };
        self.paint(text, &style).to_string()
    }

    // ------------------------------------------------------------------------
    // Layouts
    // ------------------------------------------------------------------------

    fn compose_full(&self, view: &TimerView) -> Vec<String> {
        let phases = self.schedule.phases();
        let mut lines = Vec::with_capacity(phases.len() + 4);
        lines.push(format!(
            "{} {}",
            self.paint("STORMCLOCK", &Style::new().bold()),
            self.paint(&view.schedule, &Style::new().dim())
        ));

        let finished_through = match view.status {
            RunStatus::PausedForBoss => view.phase_index + 1,
            _ => view.phase_index,
        };
        for (i, phase) in phases.iter().enumerate() {
            let (marker, line_style) = if i < finished_through {
                ("✓", Style::new().dim())
            } else if i == view.phase_index && view.status == RunStatus::Running {
                ("▶", self.phase_style(view))
            } else {
                ("·", Style::new())
            };
            let kind_tag = match phase.kind {
                PhaseKind::Safe => self.paint("safe   ", &Style::new().green()),
                PhaseKind::Closing => self.paint("closing", &Style::new().red()),
            };
            lines.push(format!(
                " {} {kind_tag} {:<32} {}",
                self.paint(marker, &line_style),
                self.paint(&phase.label, &line_style),
                format_clock(phase.duration),
            ));
        }

        let phase_bar = progress_bar(view.phase_progress(), BAR_WIDTH);
        lines.push(format!(
            " Phase [{}] {} / {}  ({} left)",
            self.paint(phase_bar, &self.phase_style(view)),
            format_clock(view.phase_elapsed),
            format_clock(view.phase_duration),
            format_clock(view.phase_remaining),
        ));
        let total_bar = progress_bar(view.total_progress(), BAR_WIDTH);
        lines.push(format!(
            " Total [{}] {} / {}",
            self.paint(total_bar, &Style::new().blue()),
            format_clock(view.total_elapsed),
            format_clock(view.total_duration),
        ));
        lines.push(format!(" {}", self.status_line(view)));
        lines
    }

    fn compose_compact(&self, view: &TimerView) -> String {
        let phase_style = self.phase_style(view);
        match view.status {
            RunStatus::Running => {
                let label = view.phase_label.as_deref().unwrap_or_default();
                let bar = progress_bar(view.phase_progress(), COMPACT_BAR_WIDTH);
                format!(
                    "{} [{}] {} left | total {} / {}",
                    self.paint(label, &phase_style),
                    self.paint(bar, &phase_style),
                    format_clock(view.phase_remaining),
                    format_clock(view.total_elapsed),
                    format_clock(view.total_duration),
                )
            }
            RunStatus::PausedForBoss => format!(
                "{} | {}",
                self.paint(view.phase_label.as_deref().unwrap_or_default(), &phase_style),
                self.status_line(view)
            ),
            RunStatus::Idle | RunStatus::Completed => format!(
                "{} | {}",
                self.paint(&view.schedule, &phase_style),
                self.status_line(view)
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    fn write_frame(&mut self, lines: &[String]) -> io::Result<()> {
        if self.interactive {
            if self.lines_drawn > 0 {
                // Back to the first line of the previous frame, clear below
                write!(self.out, "\x1b[{}F\x1b[J", self.lines_drawn)?;
            }
            for line in lines {
                writeln!(self.out, "{line}")?;
            }
            self.lines_drawn = lines.len();
        } else {
            let text = lines.join("\n");
            if self.last_text.as_deref() != Some(text.as_str()) {
                writeln!(self.out, "{text}")?;
                self.last_text = Some(text);
            }
        }
        self.out.flush()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.interactive {
            write!(self.out, "\r\x1b[2K{line}")?;
            self.lines_drawn = 1;
        } else if self.last_text.as_deref() != Some(line) {
            writeln!(self.out, "{line}")?;
            self.last_text = Some(line.to_string());
        }
        self.out.flush()
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&mut self, view: &TimerView) -> io::Result<()> {
        let result = match self.layout {
            Layout::Full => {
                let lines = self.compose_full(view);
                self.write_frame(&lines)
            }
            Layout::Compact => {
                let line = self.compose_compact(view);
                self.write_line(&line)
            }
        };
        self.frame = self.frame.wrapping_add(1);
        result
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.interactive && self.layout == Layout::Compact && self.lines_drawn > 0 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}
