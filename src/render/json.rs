//! JSON Lines renderer.

use std::io::{self, Write};

use super::RenderSink;
use crate::phase::{RunStatus, TimerView};

/// Identity of a frame at whole-second granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    status: RunStatus,
    phase_index: usize,
    remaining_secs: u64,
    warning_active: bool,
}

impl FrameKey {
    const fn of(view: &TimerView) -> Self {
        Self {
            status: view.status,
            phase_index: view.phase_index,
            remaining_secs: view.phase_remaining.as_secs(),
            warning_active: view.warning_active,
        }
    }
}

/// Writes one [`TimerView`] JSON object per line.
///
/// Sub-second renders that would produce the same visible countdown are
/// suppressed, so a 100 ms cadence yields about one line per second.
pub struct JsonRenderer {
    out: Box<dyn Write + Send>,
    last: Option<FrameKey>,
    lines: u64,
}

impl std::fmt::Debug for JsonRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRenderer")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl JsonRenderer {
    /// Creates a renderer writing to `out`.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            last: None,
            lines: 0,
        }
    }

    /// Number of lines written so far.
    #[must_use]
    pub const fn lines_written(&self) -> u64 {
        self.lines
    }
}

impl RenderSink for JsonRenderer {
    fn render(&mut self, view: &TimerView) -> io::Result<()> {
        let key = FrameKey::of(view);
        if self.last == Some(key) {
            return Ok(());
        }
        serde_json::to_writer(&mut self.out, view)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.last = Some(key);
        self.lines += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
