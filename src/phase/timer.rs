//! Phase timer state machine
//!
//! The `PhaseTimer` walks a [`Schedule`] one phase at a time. Two inputs
//! drive it:
//!
//! - [`PhaseTimer::trigger_at`]: the single user action. Starts a run from
//!   idle or completion, resumes after the boss pause, and hard-resets a run
//!   in progress.
//! - [`PhaseTimer::tick_at`]: periodic polling. Detects phase boundaries
//!   and the warning window, performing at most one transition per call.
//!
//! Every view is a pure function of the run state and the instant passed
//! in, so tests can drive the machine with synthetic time.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::schedule::{PhaseKind, PhaseSpec, Schedule};
use super::state::{RunState, RunStatus};
use super::view::TimerView;

// ============================================================================
// Outcomes
// ============================================================================

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A fresh run started at phase 0 (from idle or completed)
    Started,
    /// A run in progress was discarded and restarted at phase 0
    Restarted {
        /// Phase that was running when the reset happened
        aborted_phase: usize,
    },
    /// The boss pause ended and the next phase began
    Resumed {
        /// Phase that just started
        phase: usize,
    },
}

impl TriggerOutcome {
    /// Short action name used for logs and metric labels.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Started => "start",
            Self::Restarted { .. } => "restart",
            Self::Resumed { .. } => "resume",
        }
    }
}

/// A phase boundary crossed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    /// The next phase started counting down
    Advanced {
        /// Phase that ended
        from: usize,
        /// Phase that started
        to: usize,
    },
    /// The boss-pause phase ended and the run is suspended
    PausedForBoss {
        /// Phase that ended
        after: usize,
    },
    /// The final phase ended
    Completed {
        /// Sum of every phase duration
        total: Duration,
    },
}

impl PhaseTransition {
    /// Short kind name used for logs and metric labels.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Advanced { .. } => "advanced",
            Self::PausedForBoss { .. } => "paused_for_boss",
            Self::Completed { .. } => "completed",
        }
    }
}

/// One-shot notice that a Safe phase is about to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningCue {
    /// Index of the Safe phase that is ending
    pub phase: usize,
    /// Label of the Safe phase that is ending
    pub label: String,
    /// Remaining time when the cue fired
    pub remaining: Duration,
    /// Label of the phase that follows, if any
    pub next_label: Option<String>,
}

/// Result of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Boundary crossed during this tick, if any
    pub transition: Option<PhaseTransition>,
    /// Warning cue raised during this tick, if any
    pub warning: Option<WarningCue>,
}

impl TickOutcome {
    /// Returns `true` if the tick neither transitioned nor warned.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.transition.is_none() && self.warning.is_none()
    }
}

// ============================================================================
// PhaseTimer
// ============================================================================

/// Single-owner countdown state machine over a [`Schedule`].
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    schedule: Arc<Schedule>,
    state: RunState,
}

impl PhaseTimer {
    /// Creates an idle timer positioned at phase 0.
    #[must_use]
    pub const fn new(schedule: Arc<Schedule>) -> Self {
        Self {
            schedule,
            state: RunState::new(),
        }
    }

    /// The schedule this timer runs.
    #[must_use]
    pub const fn schedule(&self) -> &Arc<Schedule> {
        &self.schedule
    }

    /// Raw run state.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// Handles the user trigger at the current instant.
    pub fn trigger(&mut self) -> TriggerOutcome {
        self.trigger_at(Instant::now())
    }

    /// Handles the user trigger at `now`.
    ///
    /// While paused for the boss the trigger only resumes; it never resets.
    /// In every other state it starts phase 0 from scratch.
    pub fn trigger_at(&mut self, now: Instant) -> TriggerOutcome {
        match self.state.status() {
            RunStatus::PausedForBoss => {
                let phase = self.state.current_phase() + 1;
                self.state.enter_phase(phase, now);
                info!(
                    phase,
                    label = self.label_of(phase),
                    reason = "boss defeated",
                    "run resumed"
                );
                TriggerOutcome::Resumed { phase }
            }
            RunStatus::Running => {
                let aborted_phase = self.state.current_phase();
                self.state.start_run(now);
                info!(
                    aborted_phase,
                    restarts = self.state.restarts(),
                    reason = "trigger during run",
                    "run restarted"
                );
                TriggerOutcome::Restarted { aborted_phase }
            }
            RunStatus::Idle | RunStatus::Completed => {
                self.state.start_run(now);
                info!(
                    phase = 0,
                    label = self.label_of(0),
                    reason = "trigger",
                    "run started"
                );
                TriggerOutcome::Started
            }
        }
    }

    /// Polls the timer at the current instant.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Polls the timer at `now`.
    ///
    /// Crosses at most one phase boundary. A caller that polled too late to
    /// notice several boundaries catches up over consecutive ticks.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        if self.state.status() != RunStatus::Running {
            return TickOutcome::default();
        }
        let index = self.state.current_phase();
        let (Some(phase), Some(started)) =
            (self.schedule.phase(index), self.state.phase_started_at())
        else {
            return TickOutcome::default();
        };
        let (kind, duration) = (phase.kind, phase.duration);

        let elapsed = now.saturating_duration_since(started);
        if elapsed >= duration {
            return TickOutcome {
                transition: Some(self.finish_phase(index, duration, now)),
                warning: None,
            };
        }

        let remaining = duration - elapsed;
        if kind.warns_before_end()
            && !self.state.warning_fired()
            && remaining < self.schedule.warning_threshold()
        {
            self.state.mark_warning_fired();
            let cue = WarningCue {
                phase: index,
                label: phase.label.clone(),
                remaining,
                next_label: self.schedule.phase(index + 1).map(|p| p.label.clone()),
            };
            debug!(
                phase = index,
                remaining_secs = remaining.as_secs_f64(),
                "warning window entered"
            );
            return TickOutcome {
                transition: None,
                warning: Some(cue),
            };
        }

        TickOutcome::default()
    }

    fn finish_phase(&mut self, index: usize, duration: Duration, now: Instant) -> PhaseTransition {
        self.state.accumulate(duration);

        if index + 1 >= self.schedule.len() {
            self.state.complete(self.schedule.len());
            let total = self.state.elapsed_before_phase();
            info!(total_secs = total.as_secs_f64(), "run completed");
            PhaseTransition::Completed { total }
        } else if index == self.schedule.boss_pause_after() {
            self.state.pause_for_boss();
            info!(
                phase = index,
                label = self.label_of(index),
                reason = "boss pause",
                "run paused"
            );
            PhaseTransition::PausedForBoss { after: index }
        } else {
            let to = index + 1;
            self.state.enter_phase(to, now);
            info!(
                from = index,
                to,
                label = self.label_of(to),
                reason = "duration elapsed",
                "phase transition"
            );
            PhaseTransition::Advanced { from: index, to }
        }
    }

    fn label_of(&self, index: usize) -> &str {
        self.schedule.phase(index).map_or("", |p| p.label.as_str())
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.state.status()
    }

    /// Returns `true` before the first trigger.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.status() == RunStatus::Idle
    }

    /// Returns `true` while a phase counts down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status() == RunStatus::Running
    }

    /// Returns `true` while suspended for the boss fight.
    #[must_use]
    pub fn is_paused_for_boss(&self) -> bool {
        self.status() == RunStatus::PausedForBoss
    }

    /// Returns `true` once every phase has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status() == RunStatus::Completed
    }

    /// Current phase index, equal to the phase count once completed.
    #[must_use]
    pub const fn current_phase_index(&self) -> usize {
        self.state.current_phase()
    }

    /// The phase being shown: the one counting down, the one just finished
    /// while paused, or phase 0 while idle. `None` once completed.
    #[must_use]
    pub fn current_phase(&self) -> Option<&PhaseSpec> {
        self.schedule.phase(self.state.current_phase())
    }

    /// Label of [`current_phase`](Self::current_phase).
    #[must_use]
    pub fn current_phase_label(&self) -> Option<&str> {
        self.current_phase().map(|p| p.label.as_str())
    }

    /// Kind of [`current_phase`](Self::current_phase).
    #[must_use]
    pub fn current_phase_kind(&self) -> Option<PhaseKind> {
        self.current_phase().map(|p| p.kind)
    }

    /// Configured duration of the current phase, zero once completed.
    #[must_use]
    pub fn current_phase_duration(&self) -> Duration {
        self.current_phase().map_or(Duration::ZERO, |p| p.duration)
    }

    /// Elapsed time in the current phase at `now`, clamped to its duration.
    #[must_use]
    pub fn current_phase_elapsed_at(&self, now: Instant) -> Duration {
        let duration = self.current_phase_duration();
        match self.status() {
            RunStatus::Running => self
                .state
                .phase_started_at()
                .map_or(Duration::ZERO, |start| {
                    now.saturating_duration_since(start).min(duration)
                }),
            RunStatus::PausedForBoss => duration,
            RunStatus::Idle | RunStatus::Completed => Duration::ZERO,
        }
    }

    /// Remaining time in the current phase at `now`, saturating at zero.
    #[must_use]
    pub fn current_phase_remaining_at(&self, now: Instant) -> Duration {
        self.current_phase_duration()
            .saturating_sub(self.current_phase_elapsed_at(now))
    }

    /// Completed phase durations plus the running phase's elapsed time.
    #[must_use]
    pub fn total_elapsed_at(&self, now: Instant) -> Duration {
        let before = self.state.elapsed_before_phase();
        if self.is_running() {
            before + self.current_phase_elapsed_at(now)
        } else {
            before
        }
    }

    /// Sum of every phase duration.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.schedule.total_duration()
    }

    /// Label of the phase the next trigger or boundary leads into.
    #[must_use]
    pub fn next_phase_label(&self) -> Option<&str> {
        let next = match self.status() {
            RunStatus::Idle | RunStatus::Completed => 0,
            RunStatus::Running | RunStatus::PausedForBoss => self.state.current_phase() + 1,
        };
        self.schedule.phase(next).map(|p| p.label.as_str())
    }

    /// Returns `true` while the running Safe phase is inside the warning window.
    #[must_use]
    pub fn warning_active_at(&self, now: Instant) -> bool {
        if !self.is_running() || !self.current_phase_kind().is_some_and(PhaseKind::warns_before_end)
        {
            return false;
        }
        let remaining = self.current_phase_remaining_at(now);
        !remaining.is_zero() && remaining < self.schedule.warning_threshold()
    }

    /// Whether the warning cue already fired in this phase activation.
    #[must_use]
    pub const fn warning_fired(&self) -> bool {
        self.state.warning_fired()
    }

    /// Snapshot of every view at `now`.
    #[must_use]
    pub fn view_at(&self, now: Instant) -> TimerView {
        TimerView {
            schedule: self.schedule.name().to_string(),
            status: self.status(),
            phase_index: self.current_phase_index(),
            phase_count: self.schedule.len(),
            phase_label: self.current_phase_label().map(str::to_string),
            phase_kind: self.current_phase_kind(),
            phase_elapsed: self.current_phase_elapsed_at(now),
            phase_remaining: self.current_phase_remaining_at(now),
            phase_duration: self.current_phase_duration(),
            total_elapsed: self.total_elapsed_at(now),
            total_duration: self.total_duration(),
            next_phase_label: self.next_phase_label().map(str::to_string),
            warning_active: self.warning_active_at(now),
            warning_fired: self.warning_fired(),
            boss_pause_after: self.schedule.boss_pause_after(),
        }
    }

    /// Snapshot of every view at the current instant.
    #[must_use]
    pub fn view(&self) -> TimerView {
        self.view_at(Instant::now())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::schedule::DEFAULT_WARNING_THRESHOLD;
    use proptest::prelude::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn scenario_schedule() -> Arc<Schedule> {
        Arc::new(
            Schedule::new(
                "scenario",
                vec![
                    PhaseSpec::safe("Safe 1", secs(270)),
                    PhaseSpec::closing("Closing 1", secs(180)),
                    PhaseSpec::safe("Safe 2", secs(210)),
                    PhaseSpec::closing("Closing 2", secs(180)),
                ],
                1,
                DEFAULT_WARNING_THRESHOLD,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_timer_is_idle() {
        let timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        assert!(timer.is_idle());
        assert_eq!(timer.current_phase_index(), 0);
        assert_eq!(timer.current_phase_label(), Some("Safe 1"));
        assert_eq!(timer.current_phase_elapsed_at(t0), Duration::ZERO);
        assert_eq!(timer.current_phase_remaining_at(t0), secs(270));
        assert_eq!(timer.total_elapsed_at(t0), Duration::ZERO);
        assert_eq!(timer.total_duration(), secs(840));
        assert_eq!(timer.next_phase_label(), Some("Safe 1"));
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        assert!(timer.tick_at(t0 + secs(10_000)).is_quiet());
        assert!(timer.is_idle());
    }

    #[test]
    fn test_scenario_full_walkthrough() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();

        assert_eq!(timer.trigger_at(t0), TriggerOutcome::Started);
        assert!(timer.is_running());

        // Inside the warning window of phase 0
        let out = timer.tick_at(t0 + secs(269));
        assert!(out.transition.is_none());
        let cue = out.warning.expect("warning should fire");
        assert_eq!(cue.phase, 0);
        assert_eq!(cue.remaining, secs(1));
        assert_eq!(cue.next_label.as_deref(), Some("Closing 1"));
        assert_eq!(timer.current_phase_index(), 0);
        assert!(timer.warning_fired());
        assert!(timer.warning_active_at(t0 + secs(269)));

        // Fires only once per activation
        let out = timer.tick_at(t0 + Duration::from_millis(269_500));
        assert!(out.is_quiet());

        // Boundary crossed
        let out = timer.tick_at(t0 + secs(271));
        assert_eq!(
            out.transition,
            Some(PhaseTransition::Advanced { from: 0, to: 1 })
        );
        assert_eq!(timer.current_phase_index(), 1);
        assert_eq!(timer.state().elapsed_before_phase(), secs(270));
        assert_eq!(timer.state().phase_started_at(), Some(t0 + secs(271)));
        assert!(!timer.warning_fired());

        // Closing phase ends at the boss pause
        let out = timer.tick_at(t0 + secs(451));
        assert_eq!(
            out.transition,
            Some(PhaseTransition::PausedForBoss { after: 1 })
        );
        assert!(timer.is_paused_for_boss());
        assert_eq!(timer.state().elapsed_before_phase(), secs(450));
        assert_eq!(timer.total_elapsed_at(t0 + secs(900)), secs(450));
        assert_eq!(timer.next_phase_label(), Some("Safe 2"));

        // Ticks while paused do nothing
        assert!(timer.tick_at(t0 + secs(999)).is_quiet());

        // Resume
        let outcome = timer.trigger_at(t0 + secs(1000));
        assert_eq!(outcome, TriggerOutcome::Resumed { phase: 2 });
        assert_eq!(timer.current_phase_index(), 2);
        assert_eq!(timer.state().phase_started_at(), Some(t0 + secs(1000)));
        assert_eq!(timer.current_phase_elapsed_at(t0 + secs(1000)), Duration::ZERO);
        assert_eq!(timer.state().elapsed_before_phase(), secs(450));
    }

    #[test]
    fn test_scenario_restart_during_run() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);

        let outcome = timer.trigger_at(t0 + secs(100));
        assert_eq!(outcome, TriggerOutcome::Restarted { aborted_phase: 0 });
        assert!(timer.is_running());
        assert_eq!(timer.current_phase_index(), 0);
        assert_eq!(timer.state().phase_started_at(), Some(t0 + secs(100)));
        assert_eq!(timer.state().elapsed_before_phase(), Duration::ZERO);
        assert_eq!(timer.state().restarts(), 1);
    }

    #[test]
    fn test_restart_from_later_phase_discards_progress() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        timer.tick_at(t0 + secs(270));
        assert_eq!(timer.current_phase_index(), 1);

        let outcome = timer.trigger_at(t0 + secs(300));
        assert_eq!(outcome, TriggerOutcome::Restarted { aborted_phase: 1 });
        assert_eq!(timer.current_phase_index(), 0);
        assert_eq!(timer.total_elapsed_at(t0 + secs(300)), Duration::ZERO);
    }

    #[test]
    fn test_one_transition_per_tick() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);

        // Far past every boundary: first tick only leaves phase 0
        let late = t0 + secs(5000);
        let out = timer.tick_at(late);
        assert_eq!(
            out.transition,
            Some(PhaseTransition::Advanced { from: 0, to: 1 })
        );
        // Phase 1 started at `late`, so another tick at `late` does nothing
        assert!(timer.tick_at(late).transition.is_none());
        assert_eq!(timer.current_phase_index(), 1);
    }

    #[test]
    fn test_completion_and_retrigger() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        timer.tick_at(t0 + secs(270));
        timer.tick_at(t0 + secs(450));
        timer.trigger_at(t0 + secs(500));
        timer.tick_at(t0 + secs(710));
        let out = timer.tick_at(t0 + secs(890));
        assert_eq!(
            out.transition,
            Some(PhaseTransition::Completed { total: secs(840) })
        );
        assert!(timer.is_complete());
        assert_eq!(timer.current_phase_index(), 4);
        assert!(timer.current_phase().is_none());
        assert_eq!(timer.total_elapsed_at(t0 + secs(2000)), secs(840));
        assert_eq!(timer.next_phase_label(), Some("Safe 1"));

        assert_eq!(timer.trigger_at(t0 + secs(2000)), TriggerOutcome::Started);
        assert_eq!(timer.current_phase_index(), 0);
        assert_eq!(timer.state().restarts(), 0);
    }

    #[test]
    fn test_closing_phase_never_warns() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        timer.tick_at(t0 + secs(270));
        let out = timer.tick_at(t0 + secs(270 + 178));
        assert!(out.warning.is_none());
        assert!(!timer.warning_active_at(t0 + secs(270 + 178)));
    }

    #[test]
    fn test_warning_not_fired_outside_window() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        assert!(timer.tick_at(t0 + secs(265)).warning.is_none());
        assert!(!timer.warning_fired());
    }

    #[test]
    fn test_boss_pause_on_last_phase_completes() {
        let schedule = Arc::new(
            Schedule::new(
                "late",
                vec![
                    PhaseSpec::safe("Only", secs(10)),
                    PhaseSpec::closing("Last", secs(10)),
                ],
                1,
                DEFAULT_WARNING_THRESHOLD,
            )
            .unwrap(),
        );
        let mut timer = PhaseTimer::new(schedule);
        let t0 = Instant::now();
        timer.trigger_at(t0);
        timer.tick_at(t0 + secs(10));
        let out = timer.tick_at(t0 + secs(20));
        assert!(matches!(
            out.transition,
            Some(PhaseTransition::Completed { .. })
        ));
    }

    #[test]
    fn test_views_clamp_when_tick_is_late() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        let late = t0 + secs(300);
        assert_eq!(timer.current_phase_elapsed_at(late), secs(270));
        assert_eq!(timer.current_phase_remaining_at(late), Duration::ZERO);
        assert_eq!(timer.total_elapsed_at(late), secs(270));
    }

    #[test]
    fn test_view_snapshot() {
        let mut timer = PhaseTimer::new(scenario_schedule());
        let t0 = Instant::now();
        timer.trigger_at(t0);
        let view = timer.view_at(t0 + secs(268));
        assert_eq!(view.schedule, "scenario");
        assert_eq!(view.status, RunStatus::Running);
        assert_eq!(view.phase_label.as_deref(), Some("Safe 1"));
        assert_eq!(view.phase_kind, Some(PhaseKind::Safe));
        assert_eq!(view.phase_remaining, secs(2));
        assert_eq!(view.next_phase_label.as_deref(), Some("Closing 1"));
        assert!(view.warning_active);
        assert!(!view.warning_fired);
        assert_eq!(view.phase_count, 4);
    }

    #[test]
    fn test_outcome_names() {
        assert_eq!(TriggerOutcome::Started.action(), "start");
        assert_eq!(
            TriggerOutcome::Restarted { aborted_phase: 2 }.action(),
            "restart"
        );
        assert_eq!(TriggerOutcome::Resumed { phase: 2 }.action(), "resume");
        assert_eq!(
            PhaseTransition::PausedForBoss { after: 1 }.kind(),
            "paused_for_boss"
        );
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn arb_schedule() -> impl Strategy<Value = Schedule> {
        prop::collection::vec((any::<bool>(), 1u64..120), 1..10).prop_flat_map(|raw| {
            let len = raw.len();
            (Just(raw), 0..len).prop_map(|(raw, boss)| {
                let phases = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, (safe, d))| {
                        let kind = if safe {
                            PhaseKind::Safe
                        } else {
                            PhaseKind::Closing
                        };
                        PhaseSpec::new(kind, secs(d), format!("P{i}"))
                    })
                    .collect();
                Schedule::new("prop", phases, boss, DEFAULT_WARNING_THRESHOLD).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_run_completes_with_exact_total(
            schedule in arb_schedule(),
            steps in prop::collection::vec(500u64..7_000, 1..64),
            pause_ms in 0u64..600_000,
        ) {
            let schedule = Arc::new(schedule);
            let mut timer = PhaseTimer::new(Arc::clone(&schedule));
            let mut now = Instant::now();
            timer.trigger_at(now);

            let mut entries = 1usize;
            let mut warnings_this_phase = 0u32;
            let mut step = steps.iter().cycle();
            let mut guard = 0;
            while !timer.is_complete() {
                guard += 1;
                prop_assert!(guard < 100_000);

                if timer.is_paused_for_boss() {
                    now += Duration::from_millis(pause_ms);
                    let before = timer.state().elapsed_before_phase();
                    let outcome = timer.trigger_at(now);
                    prop_assert!(
                        matches!(outcome, TriggerOutcome::Resumed { .. }),
                        "expected resume, got {:?}",
                        outcome
                    );
                    prop_assert_eq!(timer.state().elapsed_before_phase(), before);
                    entries += 1;
                    warnings_this_phase = 0;
                    continue;
                }

                now += Duration::from_millis(*step.next().unwrap());
                let prev = timer.current_phase_index();
                let out = timer.tick_at(now);
                if let Some(cue) = &out.warning {
                    warnings_this_phase += 1;
                    prop_assert!(warnings_this_phase <= 1);
                    prop_assert_eq!(schedule.phases()[cue.phase].kind, PhaseKind::Safe);
                    prop_assert!(!cue.remaining.is_zero());
                    prop_assert!(cue.remaining < DEFAULT_WARNING_THRESHOLD);
                }
                match out.transition {
                    Some(PhaseTransition::Advanced { from, to }) => {
                        prop_assert_eq!(from, prev);
                        prop_assert_eq!(to, prev + 1);
                        entries += 1;
                        warnings_this_phase = 0;
                    }
                    Some(PhaseTransition::PausedForBoss { after }) => {
                        prop_assert_eq!(after, schedule.boss_pause_after());
                    }
                    Some(PhaseTransition::Completed { total }) => {
                        prop_assert_eq!(total, schedule.total_duration());
                    }
                    None => prop_assert_eq!(timer.current_phase_index(), prev),
                }
            }

            prop_assert_eq!(entries, schedule.len());
            prop_assert_eq!(timer.total_elapsed_at(now), schedule.total_duration());
        }

        #[test]
        fn prop_views_stay_within_bounds(
            schedule in arb_schedule(),
            offsets in prop::collection::vec(0u64..200_000, 1..32),
        ) {
            let mut timer = PhaseTimer::new(Arc::new(schedule));
            let start = Instant::now();
            timer.trigger_at(start);
            let mut now = start;
            for offset in offsets {
                now += Duration::from_millis(offset);
                timer.tick_at(now);
                let view = timer.view_at(now);
                prop_assert!(view.phase_elapsed <= view.phase_duration);
                prop_assert!(view.total_elapsed <= view.total_duration);
                prop_assert_eq!(view.phase_elapsed + view.phase_remaining, view.phase_duration);
                prop_assert!((0.0..=1.0).contains(&view.total_progress()));
            }
        }
    }
}
