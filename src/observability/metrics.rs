//! Metrics collection for `stormclock`.
//!
//! Prometheus-compatible counters and gauges describing what the timer is
//! doing, for dashboards and stream overlays that scrape rather than tail.
//! Every label value comes from a closed set, so cardinality is bounded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::StormclockError;
use crate::phase::{PhaseTransition, TriggerOutcome};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `StormclockError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), StormclockError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| StormclockError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "stormclock_triggers_total",
        "Triggers handled, by resulting action"
    );
    describe_counter!(
        "stormclock_phase_transitions_total",
        "Phase boundaries crossed, by kind"
    );
    describe_counter!("stormclock_warnings_total", "Warning cues fired");
    describe_gauge!(
        "stormclock_current_phase",
        "Index of the current phase (phase count once completed)"
    );
    describe_gauge!("stormclock_paused", "1 while paused for the boss fight");
    describe_gauge!(
        "stormclock_phase_remaining_seconds",
        "Remaining time in the current phase"
    );
}

/// Records a handled trigger.
pub fn record_trigger(outcome: TriggerOutcome) {
    counter!("stormclock_triggers_total", "action" => outcome.action()).increment(1);
    gauge!("stormclock_paused").set(0.0);
}

/// Records a phase boundary crossing.
pub fn record_transition(transition: PhaseTransition) {
    counter!("stormclock_phase_transitions_total", "kind" => transition.kind()).increment(1);
    let paused = matches!(transition, PhaseTransition::PausedForBoss { .. });
    gauge!("stormclock_paused").set(if paused { 1.0 } else { 0.0 });
}

/// Records a fired warning cue.
pub fn record_warning() {
    counter!("stormclock_warnings_total").increment(1);
}

/// Sets the current phase gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_current_phase(index: usize) {
    gauge!("stormclock_current_phase").set(index as f64);
}

/// Sets the remaining-time gauge.
pub fn set_phase_remaining(remaining: Duration) {
    gauge!("stormclock_phase_remaining_seconds").set(remaining.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        // metrics macros silently no-op when no global recorder is installed
        record_trigger(TriggerOutcome::Started);
        record_trigger(TriggerOutcome::Restarted { aborted_phase: 2 });
        record_transition(PhaseTransition::Advanced { from: 0, to: 1 });
        record_transition(PhaseTransition::PausedForBoss { after: 3 });
        record_transition(PhaseTransition::Completed {
            total: Duration::from_secs(840),
        });
        record_warning();
        set_current_phase(4);
        set_phase_remaining(Duration::from_millis(1500));
    }
}
