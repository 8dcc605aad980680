//! Warning cue notifiers
//!
//! A [`Notifier`] receives the one-shot warning cue raised when a Safe
//! phase is about to end. Implementations must return immediately; any
//! audible or visual pattern plays out on its own task.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::phase::WarningCue;

/// Receiver for warning cues.
pub trait Notifier: Send + Sync {
    /// Plays the warning cue. Must not block.
    fn warn(&self, cue: &WarningCue);
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn warn(&self, cue: &WarningCue) {
        debug!(phase = cue.phase, "warning cue muted");
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Rings the terminal bell a few times in quick succession.
#[derive(Clone)]
pub struct BellNotifier {
    writer: SharedWriter,
    pattern: u32,
    gap: Duration,
}

impl std::fmt::Debug for BellNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BellNotifier")
            .field("pattern", &self.pattern)
            .field("gap", &self.gap)
            .finish_non_exhaustive()
    }
}

impl Default for BellNotifier {
    fn default() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }
}

impl BellNotifier {
    /// Number of rings per cue.
    pub const DEFAULT_PATTERN: u32 = 3;

    /// Pause between rings.
    pub const DEFAULT_GAP: Duration = Duration::from_millis(150);

    /// Creates a notifier that writes BEL characters to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            pattern: Self::DEFAULT_PATTERN,
            gap: Self::DEFAULT_GAP,
        }
    }

    /// Overrides the ring count and spacing.
    #[must_use]
    pub const fn with_pattern(mut self, pattern: u32, gap: Duration) -> Self {
        self.pattern = pattern;
        self.gap = gap;
        self
    }

    fn ring(writer: &SharedWriter) -> std::io::Result<()> {
        let mut w = writer
            .lock()
            .map_err(|_| std::io::Error::other("bell writer lock poisoned"))?;
        w.write_all(b"\x07")?;
        w.flush()
    }
}

impl Notifier for BellNotifier {
    fn warn(&self, cue: &WarningCue) {
        debug!(phase = cue.phase, label = %cue.label, "ringing warning bell");

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            if let Err(e) = Self::ring(&self.writer) {
                warn!(error = %e, "failed to ring bell");
            }
            return;
        };

        let writer = Arc::clone(&self.writer);
        let (pattern, gap) = (self.pattern, self.gap);
        handle.spawn(async move {
            for i in 0..pattern {
                if i > 0 {
                    tokio::time::sleep(gap).await;
                }
                if let Err(e) = Self::ring(&writer) {
                    warn!(error = %e, "failed to ring bell");
                    return;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn cue() -> WarningCue {
        WarningCue {
            phase: 0,
            label: "Day 1: First Storm Safe".to_string(),
            remaining: Duration::from_secs(4),
            next_label: Some("Day 1: First Storm Closing".to_string()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_rings_pattern_without_blocking() {
        let capture = Capture::default();
        let notifier = BellNotifier::new(Box::new(capture.clone()));

        notifier.warn(&cue());
        // Nothing has run yet: warn only spawned the task
        assert!(capture.0.lock().unwrap().len() <= 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(capture.0.lock().unwrap().as_slice(), b"\x07\x07\x07");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_custom_pattern() {
        let capture = Capture::default();
        let notifier = BellNotifier::new(Box::new(capture.clone()))
            .with_pattern(1, Duration::from_millis(10));
        notifier.warn(&cue());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(capture.0.lock().unwrap().as_slice(), b"\x07");
    }

    #[test]
    fn test_bell_outside_runtime_rings_once() {
        let capture = Capture::default();
        let notifier = BellNotifier::new(Box::new(capture.clone()));
        notifier.warn(&cue());
        assert_eq!(capture.0.lock().unwrap().as_slice(), b"\x07");
    }

    #[test]
    fn test_noop_notifier() {
        NoopNotifier.warn(&cue());
    }
}
