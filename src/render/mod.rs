//! Render sinks
//!
//! A [`RenderSink`] draws one [`TimerView`] per call. Sinks never see the
//! timer itself, only the snapshot the driver computed for that frame.

pub mod format;
pub mod json;
pub mod terminal;

use std::io::{self, Write};
use std::sync::Arc;

pub use format::{format_clock, progress_bar};
pub use json::JsonRenderer;
pub use terminal::{Layout, TerminalRenderer};

use crate::config::DisplayMode;
use crate::phase::{Schedule, TimerView};

/// Destination for rendered frames.
pub trait RenderSink: Send {
    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn render(&mut self, view: &TimerView) -> io::Result<()>;

    /// Flushes any partial output before the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds the sink for a display mode.
///
/// `colors` and `interactive` only apply to the terminal layouts.
#[must_use]
pub fn sink_for(
    mode: DisplayMode,
    out: Box<dyn Write + Send>,
    schedule: Arc<Schedule>,
    colors: bool,
    interactive: bool,
) -> Box<dyn RenderSink> {
    match mode {
        DisplayMode::Full => Box::new(TerminalRenderer::new(
            out,
            schedule,
            Layout::Full,
            colors,
            interactive,
        )),
        DisplayMode::Compact => Box::new(TerminalRenderer::new(
            out,
            schedule,
            Layout::Compact,
            colors,
            interactive,
        )),
        DisplayMode::Json => Box::new(JsonRenderer::new(out)),
    }
}
