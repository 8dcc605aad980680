//! Timer driver
//!
//! The [`Driver`] is the only owner of the [`PhaseTimer`]. Input sources
//! send [`TimerCommand`]s over a channel; the driver interleaves them with
//! cadence ticks in one `select!` loop, so a trigger and a tick never run
//! at the same time. After every trigger or tick it renders one frame.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::notify::{NoopNotifier, Notifier};
use crate::observability::events::{Event, EventEmitter, StopReason};
use crate::observability::metrics;
use crate::phase::{PhaseTimer, PhaseTransition, RunStatus, TriggerOutcome, WarningCue};
use crate::render::RenderSink;

/// Default tick cadence while a phase counts down.
pub const DEFAULT_RUNNING_INTERVAL: Duration = Duration::from_millis(100);

/// Default tick cadence while idle, paused, or completed.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(200);

/// Command sent from an input source to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// The single user action
    Trigger,
    /// Stop the driver loop
    Quit,
}

/// Driver loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Tick cadence while a phase counts down
    pub running_interval: Duration,
    /// Tick cadence while idle, paused, or completed
    pub idle_interval: Duration,
    /// Trigger once before the first frame
    pub autostart: bool,
    /// Stop the loop as soon as the run completes
    pub exit_on_complete: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            running_interval: DEFAULT_RUNNING_INTERVAL,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            autostart: false,
            exit_on_complete: false,
        }
    }
}

/// Summary returned when the driver loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Phase activations, counting restarts and resumes
    pub phases_entered: u64,
    /// Warning cues fired
    pub warnings: u64,
    /// Triggers handled
    pub triggers: u64,
    /// Timer status when the loop exited
    pub final_status: RunStatus,
    /// Why the loop exited
    pub stop_reason: StopReason,
}

/// Serialized execution context around a [`PhaseTimer`].
pub struct Driver {
    timer: PhaseTimer,
    sink: Box<dyn RenderSink>,
    notifier: Arc<dyn Notifier>,
    events: Arc<EventEmitter>,
    config: DriverConfig,
    commands: mpsc::Receiver<TimerCommand>,
    cancel: CancellationToken,
    phases_entered: u64,
    warnings: u64,
    triggers: u64,
    render_failed: bool,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("timer", &self.timer)
            .field("config", &self.config)
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Creates a driver with a silent notifier and a discarding event stream.
    #[must_use]
    pub fn new(
        timer: PhaseTimer,
        sink: Box<dyn RenderSink>,
        commands: mpsc::Receiver<TimerCommand>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            timer,
            sink,
            notifier: Arc::new(NoopNotifier),
            events: Arc::new(EventEmitter::noop()),
            config: DriverConfig::default(),
            commands,
            cancel,
            phases_entered: 0,
            warnings: 0,
            triggers: 0,
            render_failed: false,
        }
    }

    /// Sets the warning cue receiver.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the structured event stream.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// Sets the loop settings.
    #[must_use]
    pub const fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the loop until quit, cancellation, closed input, or (with
    /// `exit_on_complete`) completion.
    pub async fn run(mut self) -> RunReport {
        info!(
            schedule = self.timer.schedule().name(),
            phases = self.timer.schedule().len(),
            autostart = self.config.autostart,
            "timer driver started"
        );

        if self.config.autostart {
            self.handle_trigger();
        }
        self.render();

        let mut cadence = self.cadence();
        let mut interval = ticker(cadence);

        let stop_reason = loop {
            if self.config.exit_on_complete && self.timer.is_complete() {
                break StopReason::Completed;
            }

            let wanted = self.cadence();
            if wanted != cadence {
                debug!(interval = ?wanted, "tick cadence changed");
                cadence = wanted;
                interval = ticker(cadence);
            }

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break StopReason::Cancelled,
                command = self.commands.recv() => match command {
                    Some(TimerCommand::Trigger) => self.handle_trigger(),
                    Some(TimerCommand::Quit) => break StopReason::Quit,
                    None => break StopReason::InputClosed,
                },
                _ = interval.tick() => self.handle_tick(),
            }
            self.render();
        };

        if let Err(e) = self.sink.finish() {
            warn!(error = %e, "failed to flush renderer");
        }

        info!(
            reason = %stop_reason,
            triggers = self.triggers,
            warnings = self.warnings,
            "timer driver stopped"
        );
        self.events.emit(Event::TimerStopped {
            timestamp: Utc::now(),
            reason: stop_reason,
            triggers: self.triggers,
            warnings: self.warnings,
        });

        RunReport {
            phases_entered: self.phases_entered,
            warnings: self.warnings,
            triggers: self.triggers,
            final_status: self.timer.status(),
            stop_reason,
        }
    }

    fn cadence(&self) -> Duration {
        if self.timer.is_running() {
            self.config.running_interval
        } else {
            self.config.idle_interval
        }
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    fn handle_trigger(&mut self) {
        let outcome = self.timer.trigger_at(Instant::now());
        self.triggers += 1;
        metrics::record_trigger(outcome);

        let timestamp = Utc::now();
        let entered = match outcome {
            TriggerOutcome::Started => {
                let schedule = self.timer.schedule();
                self.events.emit(Event::RunStarted {
                    timestamp,
                    schedule: schedule.name().to_string(),
                    phase_count: schedule.len(),
                    total_duration_secs: schedule.total_duration().as_secs_f64(),
                });
                0
            }
            TriggerOutcome::Restarted { aborted_phase } => {
                self.events.emit(Event::RunRestarted {
                    timestamp,
                    aborted_phase,
                    restarts: self.timer.state().restarts(),
                });
                0
            }
            TriggerOutcome::Resumed { phase } => {
                self.events.emit(Event::RunResumed {
                    timestamp,
                    phase_index: phase,
                });
                phase
            }
        };
        self.phase_entered(entered);
    }

    fn handle_tick(&mut self) {
        let now = Instant::now();
        let outcome = self.timer.tick_at(now);

        if let Some(transition) = outcome.transition {
            metrics::record_transition(transition);
            let timestamp = Utc::now();
            match transition {
                PhaseTransition::Advanced { to, .. } => self.phase_entered(to),
                PhaseTransition::PausedForBoss { after } => {
                    self.events.emit(Event::BossPauseStarted {
                        timestamp,
                        after_phase: after,
                        elapsed_secs: self.timer.total_elapsed_at(now).as_secs_f64(),
                    });
                }
                PhaseTransition::Completed { total } => {
                    self.events.emit(Event::RunCompleted {
                        timestamp,
                        total_secs: total.as_secs_f64(),
                    });
                }
            }
        }

        if let Some(cue) = outcome.warning {
            self.warn(&cue);
        }
    }

    fn phase_entered(&mut self, index: usize) {
        self.phases_entered += 1;
        if let Some(phase) = self.timer.schedule().phase(index) {
            self.events.emit(Event::PhaseEntered {
                timestamp: Utc::now(),
                phase_index: index,
                label: phase.label.clone(),
                kind: phase.kind,
                duration_secs: phase.duration.as_secs_f64(),
            });
        }
    }

    fn warn(&mut self, cue: &WarningCue) {
        self.warnings += 1;
        metrics::record_warning();
        self.events.emit(Event::WarningCue {
            timestamp: Utc::now(),
            phase_index: cue.phase,
            label: cue.label.clone(),
            remaining_secs: cue.remaining.as_secs_f64(),
            next_label: cue.next_label.clone(),
        });
        self.notifier.warn(cue);
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    fn render(&mut self) {
        let view = self.timer.view_at(Instant::now());
        metrics::set_current_phase(view.phase_index);
        metrics::set_phase_remaining(view.phase_remaining);

        match self.sink.render(&view) {
            Ok(()) => self.render_failed = false,
            Err(e) if self.render_failed => debug!(error = %e, "render failed again"),
            Err(e) => {
                warn!(error = %e, "render failed");
                self.render_failed = true;
            }
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
