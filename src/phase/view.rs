//! Render snapshot
//!
//! [`TimerView`] is everything a render sink needs for one frame, computed
//! from the run state at a single instant so that every figure on screen
//! agrees with every other.

use std::time::Duration;

use serde::{Serialize, Serializer};

use super::schedule::PhaseKind;
use super::state::RunStatus;

/// A point-in-time snapshot of a [`PhaseTimer`](super::PhaseTimer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerView {
    /// Schedule name
    pub schedule: String,
    /// Lifecycle status
    pub status: RunStatus,
    /// Current phase index (equals `phase_count` once completed)
    pub phase_index: usize,
    /// Number of phases in the schedule
    pub phase_count: usize,
    /// Label of the current phase (for a boss pause, the phase just finished)
    pub phase_label: Option<String>,
    /// Kind of the current phase
    pub phase_kind: Option<PhaseKind>,
    /// Elapsed time in the current phase, clamped to its duration
    #[serde(serialize_with = "as_secs")]
    pub phase_elapsed: Duration,
    /// Remaining time in the current phase, saturating at zero
    #[serde(serialize_with = "as_secs")]
    pub phase_remaining: Duration,
    /// Configured duration of the current phase
    #[serde(serialize_with = "as_secs")]
    pub phase_duration: Duration,
    /// Completed phase durations plus the current phase's elapsed time
    #[serde(serialize_with = "as_secs")]
    pub total_elapsed: Duration,
    /// Sum of every phase duration
    #[serde(serialize_with = "as_secs")]
    pub total_duration: Duration,
    /// Label of the phase a trigger or the next boundary leads into
    pub next_phase_label: Option<String>,
    /// Current Safe phase is inside the warning window
    pub warning_active: bool,
    /// The warning cue already fired in this phase activation
    pub warning_fired: bool,
    /// Index after which the run suspends for the boss fight
    pub boss_pause_after: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl TimerView {
    /// Fraction of the current phase that has elapsed, in `[0, 1]`.
    #[must_use]
    pub fn phase_progress(&self) -> f64 {
        fraction(self.phase_elapsed, self.phase_duration)
    }

    /// Fraction of the whole schedule that has elapsed, in `[0, 1]`.
    #[must_use]
    pub fn total_progress(&self) -> f64 {
        fraction(self.total_elapsed, self.total_duration)
    }

    /// Returns `true` while a phase is counting down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Returns `true` while a Closing phase is counting down.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.is_running() && self.phase_kind == Some(PhaseKind::Closing)
    }
}

fn fraction(part: Duration, whole: Duration) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part.as_secs_f64() / whole.as_secs_f64()).clamp(0.0, 1.0)
}
