//! Walks the reference two-day schedule end to end with synthetic time.

use std::time::Duration;

use stormclock::config::load_preset;
use stormclock::phase::{PhaseTimer, PhaseTransition, RunStatus, TriggerOutcome};
use tokio::time::Instant;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Ticks every 150 ms from `from` to `to`, collecting transitions and cues.
fn tick_through(
    timer: &mut PhaseTimer,
    from: Instant,
    to: Instant,
) -> (Vec<PhaseTransition>, Vec<usize>) {
    let mut transitions = Vec::new();
    let mut warnings = Vec::new();
    let mut now = from;
    while now <= to {
        let outcome = timer.tick_at(now);
        transitions.extend(outcome.transition);
        warnings.extend(outcome.warning.map(|w| w.phase));
        now += Duration::from_millis(150);
    }
    (transitions, warnings)
}

#[test]
fn full_two_day_run_with_boss_pause() {
    let schedule = load_preset("nightreign").unwrap();
    let mut timer = PhaseTimer::new(schedule);
    let t0 = Instant::now();

    assert_eq!(timer.trigger_at(t0), TriggerOutcome::Started);

    // Day 1: 270 + 180 + 210 + 180 = 840 s, then the boss pause
    let (transitions, warnings) = tick_through(&mut timer, t0, t0 + secs(900));
    assert_eq!(
        transitions,
        vec![
            PhaseTransition::Advanced { from: 0, to: 1 },
            PhaseTransition::Advanced { from: 1, to: 2 },
            PhaseTransition::Advanced { from: 2, to: 3 },
            PhaseTransition::PausedForBoss { after: 3 },
        ]
    );
    assert_eq!(warnings, vec![0, 2]);
    assert!(timer.is_paused_for_boss());
    assert_eq!(timer.state().elapsed_before_phase(), secs(840));

    // The boss fight takes a long time; none of it is counted
    let resume_at = t0 + secs(2000);
    assert_eq!(
        timer.trigger_at(resume_at),
        TriggerOutcome::Resumed { phase: 4 }
    );
    assert_eq!(timer.current_phase_elapsed_at(resume_at), Duration::ZERO);
    assert_eq!(timer.total_elapsed_at(resume_at), secs(840));
    assert_eq!(
        timer.current_phase_label(),
        Some("Day 2: First Storm Safe")
    );

    // Day 2
    let (transitions, warnings) =
        tick_through(&mut timer, resume_at, resume_at + secs(900));
    assert_eq!(
        transitions,
        vec![
            PhaseTransition::Advanced { from: 4, to: 5 },
            PhaseTransition::Advanced { from: 5, to: 6 },
            PhaseTransition::Advanced { from: 6, to: 7 },
            PhaseTransition::Completed { total: secs(1680) },
        ]
    );
    assert_eq!(warnings, vec![4, 6]);
    assert_eq!(timer.status(), RunStatus::Completed);
    assert_eq!(timer.total_elapsed_at(resume_at + secs(5000)), secs(1680));
}

#[test]
fn retrigger_mid_run_discards_progress() {
    let schedule = load_preset("nightreign").unwrap();
    let mut timer = PhaseTimer::new(schedule);
    let t0 = Instant::now();
    timer.trigger_at(t0);
    tick_through(&mut timer, t0, t0 + secs(500));
    assert_eq!(timer.current_phase_index(), 2);

    let again = t0 + secs(500);
    assert_eq!(
        timer.trigger_at(again),
        TriggerOutcome::Restarted { aborted_phase: 2 }
    );
    assert_eq!(timer.current_phase_index(), 0);
    assert_eq!(timer.state().elapsed_before_phase(), Duration::ZERO);
    assert_eq!(timer.total_elapsed_at(again + secs(10)), secs(10));
    assert_eq!(timer.state().restarts(), 1);
}

#[test]
fn completed_run_can_start_again() {
    let schedule = load_preset("nightreign-day").unwrap();
    let mut timer = PhaseTimer::new(schedule);
    let t0 = Instant::now();
    timer.trigger_at(t0);
    tick_through(&mut timer, t0, t0 + secs(500));
    assert!(timer.is_paused_for_boss());

    let resume = t0 + secs(600);
    timer.trigger_at(resume);
    tick_through(&mut timer, resume, resume + secs(500));
    assert!(timer.is_complete());

    let restart = resume + secs(1000);
    assert_eq!(timer.trigger_at(restart), TriggerOutcome::Started);
    assert!(timer.is_running());
    assert_eq!(timer.current_phase_index(), 0);
    assert!(!timer.warning_fired());
}
