//! `run` command handler
//!
//! Resolves the schedule and display settings, wires the input sources,
//! notifier, and event stream around a [`Driver`], and runs it until it
//! stops.

use std::io::IsTerminal;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::args::{ColorChoice, RunArgs};
use crate::config::validation::{IDLE_INTERVAL_RANGE_MS, RUNNING_INTERVAL_RANGE_MS};
use crate::config::{
    ConfigLoader, DEFAULT_PRESET, DisplayConfig, DisplayMode, LoadResult, find_preset,
    suggest_preset,
};
use crate::error::{ConfigError, ScheduleError, StormclockError};
use crate::notify::{BellNotifier, NoopNotifier, Notifier};
use crate::observability::EventEmitter;
use crate::phase::PhaseTimer;
use crate::render::sink_for;
use crate::runtime::{
    self, DEFAULT_IDLE_INTERVAL, DEFAULT_RUNNING_INTERVAL, Driver, DriverConfig, TimerCommand,
};

/// Capacity of the command channel shared by the input sources.
const COMMAND_BUFFER: usize = 16;

/// Runs the countdown timer.
///
/// # Errors
///
/// Returns a configuration error if the schedule cannot be loaded, a usage
/// error for an invalid speed or interval, or an I/O error if the events
/// file or metrics listener cannot be opened.
pub async fn run(
    args: &RunArgs,
    color: ColorChoice,
    cancel: CancellationToken,
) -> Result<(), StormclockError> {
    let loaded = load_source(args)?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let schedule = match loaded.schedule.scaled(args.speed) {
        Ok(scaled) => Arc::new(scaled),
        Err(e @ ScheduleError::InvalidSpeed(_)) => {
            return Err(StormclockError::Usage(e.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let display = &loaded.display;
    let driver_config = DriverConfig {
        running_interval: resolve_interval(
            "--running-interval-ms",
            args.running_interval_ms.or(display.running_interval_ms),
            &RUNNING_INTERVAL_RANGE_MS,
            DEFAULT_RUNNING_INTERVAL,
        )?,
        idle_interval: resolve_interval(
            "--idle-interval-ms",
            args.idle_interval_ms.or(display.idle_interval_ms),
            &IDLE_INTERVAL_RANGE_MS,
            DEFAULT_IDLE_INTERVAL,
        )?,
        autostart: args.autostart,
        exit_on_complete: args.exit_on_complete,
    };

    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };

    let mode = args.mode.or(display.mode).unwrap_or_default();
    let interactive = std::io::stdout().is_terminal() && mode != DisplayMode::Json;
    let colors = color.enabled_for(std::io::stdout().is_terminal());
    let sink = sink_for(
        mode,
        Box::new(std::io::stdout()),
        Arc::clone(&schedule),
        colors,
        interactive,
    );

    let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
    if !args.no_stdin {
        runtime::spawn_stdin(commands.clone(), cancel.clone());
    }
    spawn_signal_source(&commands, &cancel);

    info!(
        schedule = schedule.name(),
        phases = schedule.len(),
        speed = args.speed,
        mode = ?mode,
        "starting timer"
    );

    let report = Driver::new(PhaseTimer::new(schedule), sink, receiver, cancel)
        .with_notifier(notifier(args, display))
        .with_events(Arc::new(events))
        .with_config(driver_config)
        .run()
        .await;

    // Held until here so an input source ending never reads as closed input
    drop(commands);

    info!(
        reason = %report.stop_reason,
        status = %report.final_status,
        phases_entered = report.phases_entered,
        warnings = report.warnings,
        triggers = report.triggers,
        "timer stopped"
    );
    Ok(())
}

/// Loads the schedule named by `--config` or `--preset`, falling back to
/// the default preset.
fn load_source(args: &RunArgs) -> Result<LoadResult, ConfigError> {
    if let Some(path) = &args.config {
        info!(config = %path.display(), "loading configuration");
        return ConfigLoader::with_defaults().load(path);
    }

    let name = args.preset.as_deref().unwrap_or(DEFAULT_PRESET);
    info!(preset = name, "loading built-in preset");
    let preset = find_preset(name).ok_or_else(|| ConfigError::UnknownPreset {
        name: name.to_string(),
        suggestion: suggest_preset(name),
    })?;
    preset.load()
}

fn resolve_interval(
    flag: &str,
    value: Option<u64>,
    range: &RangeInclusive<u64>,
    default: Duration,
) -> Result<Duration, StormclockError> {
    match value {
        None => Ok(default),
        Some(ms) if range.contains(&ms) => Ok(Duration::from_millis(ms)),
        Some(ms) => Err(StormclockError::Usage(format!(
            "{flag} must be between {} and {} ms, got {ms}",
            range.start(),
            range.end()
        ))),
    }
}

#[cfg(unix)]
fn spawn_signal_source(commands: &mpsc::Sender<TimerCommand>, cancel: &CancellationToken) {
    if let Err(e) = runtime::spawn_signal_trigger(commands.clone(), cancel.clone()) {
        warn!(error = %e, "SIGUSR1 trigger unavailable");
    }
}

#[cfg(not(unix))]
fn spawn_signal_source(_commands: &mpsc::Sender<TimerCommand>, _cancel: &CancellationToken) {}

fn notifier(args: &RunArgs, display: &DisplayConfig) -> Arc<dyn Notifier> {
    if args.no_bell || display.bell == Some(false) {
        Arc::new(NoopNotifier)
    } else {
        Arc::new(BellNotifier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_interval() {
        let range = 50..=1000;
        let default = Duration::from_millis(100);
        assert_eq!(
            resolve_interval("--x", None, &range, default).unwrap(),
            default
        );
        assert_eq!(
            resolve_interval("--x", Some(250), &range, default).unwrap(),
            Duration::from_millis(250)
        );
        let err = resolve_interval("--x", Some(10), &range, default).unwrap_err();
        assert!(err.to_string().contains("--x must be between 50 and 1000 ms, got 10"));
    }
}
