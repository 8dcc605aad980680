//! Structured event stream for `stormclock`.
//!
//! Discrete, typed events emitted as a run progresses. Events are
//! serialized as newline-delimited JSON (JSONL) with a monotonically
//! increasing sequence number, so an external overlay or logger can follow
//! a run without parsing the terminal output.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::PhaseKind;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a run.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A fresh run started at phase 0.
    RunStarted {
        /// When the trigger arrived.
        timestamp: DateTime<Utc>,
        /// Schedule name.
        schedule: String,
        /// Number of phases.
        phase_count: usize,
        /// Sum of every phase duration, in seconds.
        total_duration_secs: f64,
    },

    /// A run in progress was discarded and restarted at phase 0.
    RunRestarted {
        /// When the trigger arrived.
        timestamp: DateTime<Utc>,
        /// Phase that was running.
        aborted_phase: usize,
        /// Hard resets so far in this process.
        restarts: u64,
    },

    /// A phase started counting down.
    PhaseEntered {
        /// When the phase started.
        timestamp: DateTime<Utc>,
        /// Zero-based index of the phase.
        phase_index: usize,
        /// Phase label.
        label: String,
        /// Safe or closing.
        kind: PhaseKind,
        /// Phase length in seconds.
        duration_secs: f64,
    },

    /// The run suspended for the boss fight.
    BossPauseStarted {
        /// When the pause began.
        timestamp: DateTime<Utc>,
        /// Phase after which the run paused.
        after_phase: usize,
        /// Run time accumulated so far, in seconds.
        elapsed_secs: f64,
    },

    /// The boss pause ended.
    RunResumed {
        /// When the trigger arrived.
        timestamp: DateTime<Utc>,
        /// Phase that started.
        phase_index: usize,
    },

    /// A Safe phase entered its warning window.
    WarningCue {
        /// When the cue fired.
        timestamp: DateTime<Utc>,
        /// Phase that is ending.
        phase_index: usize,
        /// Label of the phase that is ending.
        label: String,
        /// Remaining time in seconds.
        remaining_secs: f64,
        /// Label of the phase that follows.
        #[serde(skip_serializing_if = "Option::is_none")]
        next_label: Option<String>,
    },

    /// The final phase ended.
    RunCompleted {
        /// When the run completed.
        timestamp: DateTime<Utc>,
        /// Sum of every phase duration, in seconds.
        total_secs: f64,
    },

    /// The driver loop exited.
    TimerStopped {
        /// When the loop exited.
        timestamp: DateTime<Utc>,
        /// Why it exited.
        reason: StopReason,
        /// Triggers handled over the process lifetime.
        triggers: u64,
        /// Warning cues fired over the process lifetime.
        warnings: u64,
    },
}

/// Why the driver loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user asked to quit.
    Quit,
    /// The run completed and exit-on-complete was set.
    Completed,
    /// The process is shutting down (signal or cancellation).
    Cancelled,
    /// Every input source closed.
    InputClosed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Quit => "quit",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::InputClosed => "input_closed",
        })
    }
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as a single JSON line, and flushes. Serialization
/// and I/O failures are dropped; the event stream never interrupts a run.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`, truncating it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
