//! Run state representation
//!
//! Plain owned state for one timer. The driver serializes every trigger and
//! tick through a single task, so no atomics or locks are needed here; the
//! status enum makes idle, running, and paused mutually exclusive by
//! construction.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Coarse lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created, never triggered
    Idle,
    /// A phase is counting down
    Running,
    /// Suspended after the boss-pause phase, awaiting a trigger
    PausedForBoss,
    /// Every phase has run
    Completed,
}

impl RunStatus {
    /// Returns the `snake_case` name used in logs, events, and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::PausedForBoss => "paused_for_boss",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of a single run.
///
/// Only [`PhaseTimer`](super::PhaseTimer) mutates this. Accumulated time is
/// the sum of completed phase *durations*, never measured wall-clock time,
/// so boss-pause time and tick jitter cannot leak into totals.
#[derive(Debug, Clone)]
pub struct RunState {
    status: RunStatus,
    current_phase: usize,
    phase_started_at: Option<Instant>,
    elapsed_before_phase: Duration,
    warning_fired: bool,
    run_started_at: Option<Instant>,
    restarts: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    /// Creates an idle state at phase 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: RunStatus::Idle,
            current_phase: 0,
            phase_started_at: None,
            elapsed_before_phase: Duration::ZERO,
            warning_fired: false,
            run_started_at: None,
            restarts: 0,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Current phase index. Equals the phase count once completed.
    #[must_use]
    pub const fn current_phase(&self) -> usize {
        self.current_phase
    }

    /// Start of the current phase's countdown, if one has begun.
    #[must_use]
    pub const fn phase_started_at(&self) -> Option<Instant> {
        self.phase_started_at
    }

    /// Sum of the durations of every completed phase in this run.
    #[must_use]
    pub const fn elapsed_before_phase(&self) -> Duration {
        self.elapsed_before_phase
    }

    /// Whether the warning cue already fired in this phase activation.
    #[must_use]
    pub const fn warning_fired(&self) -> bool {
        self.warning_fired
    }

    /// Instant of the trigger that started the current run.
    #[must_use]
    pub const fn run_started_at(&self) -> Option<Instant> {
        self.run_started_at
    }

    /// Number of mid-run hard resets over the lifetime of this state.
    #[must_use]
    pub const fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Discards all progress and starts phase 0 at `now`.
    pub(super) fn start_run(&mut self, now: Instant) {
        if self.status == RunStatus::Running {
            self.restarts = self.restarts.saturating_add(1);
        }
        self.elapsed_before_phase = Duration::ZERO;
        self.run_started_at = Some(now);
        self.enter_phase(0, now);
    }

    /// Starts the countdown of `index` at `now` with a fresh warning flag.
    pub(super) fn enter_phase(&mut self, index: usize, now: Instant) {
        self.status = RunStatus::Running;
        self.current_phase = index;
        self.phase_started_at = Some(now);
        self.warning_fired = false;
    }

    /// Adds a completed phase's configured duration to the accumulator.
    pub(super) fn accumulate(&mut self, duration: Duration) {
        self.elapsed_before_phase = self.elapsed_before_phase.saturating_add(duration);
    }

    /// Freezes at the current phase until the next trigger.
    pub(super) fn pause_for_boss(&mut self) {
        self.status = RunStatus::PausedForBoss;
        self.phase_started_at = None;
    }

    /// Marks the run finished, parking the index one past the last phase.
    pub(super) fn complete(&mut self, phase_count: usize) {
        self.status = RunStatus::Completed;
        self.current_phase = phase_count;
        self.phase_started_at = None;
    }

    pub(super) fn mark_warning_fired(&mut self) {
        self.warning_fired = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = RunState::new();
        assert_eq!(state.status(), RunStatus::Idle);
        assert_eq!(state.current_phase(), 0);
        assert!(state.phase_started_at().is_none());
        assert_eq!(state.elapsed_before_phase(), Duration::ZERO);
        assert!(!state.warning_fired());
        assert_eq!(state.restarts(), 0);
    }

    #[test]
    fn test_start_run_resets_accumulators() {
        let now = Instant::now();
        let mut state = RunState::new();
        state.start_run(now);
        state.accumulate(Duration::from_secs(30));
        state.enter_phase(1, now);
        state.mark_warning_fired();

        state.start_run(now);
        assert_eq!(state.status(), RunStatus::Running);
        assert_eq!(state.current_phase(), 0);
        assert_eq!(state.elapsed_before_phase(), Duration::ZERO);
        assert!(!state.warning_fired());
        assert_eq!(state.restarts(), 1);
    }

    #[test]
    fn test_start_from_idle_is_not_a_restart() {
        let mut state = RunState::new();
        state.start_run(Instant::now());
        assert_eq!(state.restarts(), 0);
    }

    #[test]
    fn test_enter_phase_clears_warning_flag() {
        let now = Instant::now();
        let mut state = RunState::new();
        state.start_run(now);
        state.mark_warning_fired();
        state.enter_phase(1, now);
        assert!(!state.warning_fired());
        assert_eq!(state.phase_started_at(), Some(now));
    }

    #[test]
    fn test_pause_and_complete_clear_phase_clock() {
        let mut state = RunState::new();
        state.start_run(Instant::now());
        state.pause_for_boss();
        assert_eq!(state.status(), RunStatus::PausedForBoss);
        assert!(state.phase_started_at().is_none());

        state.complete(4);
        assert_eq!(state.status(), RunStatus::Completed);
        assert_eq!(state.current_phase(), 4);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(RunStatus::PausedForBoss.to_string(), "paused_for_boss");
        assert_eq!(
            serde_json::to_string(&RunStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
