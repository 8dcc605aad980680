//! Configuration schema types
//!
//! These types mirror the YAML configuration file one-to-one. They are
//! deliberately loose (durations are raw values, indices unchecked) so that
//! the [`Validator`](super::Validator) can report every problem at once;
//! [`ClockConfig::to_schedule`] turns a validated config into the strict
//! [`Schedule`] the timer runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::phase::{DEFAULT_WARNING_THRESHOLD, PhaseKind, PhaseSpec, Schedule};

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root of a `stormclock` configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    /// Phase schedule (required)
    pub schedule: ScheduleConfig,

    /// Display preferences; command-line flags take precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,
}

/// The `schedule` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Schedule name
    pub name: String,

    /// Index of the phase after which the run waits for the boss fight
    pub boss_pause_after: usize,

    /// Length of the warning window before a Safe phase ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_seconds: Option<DurationValue>,

    /// Ordered phases
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

/// One entry of `schedule.phases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    /// Display label
    #[serde(default)]
    pub label: String,

    /// `safe` or `closing`
    pub kind: PhaseKind,

    /// Phase length
    pub duration: DurationValue,
}

// ============================================================================
// Durations
// ============================================================================

/// A duration written either as a number of seconds or a humantime string.
///
/// ```yaml
/// duration: 270        # seconds
/// duration: 4.5        # fractional seconds
/// duration: 4m30s      # humantime
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    /// Seconds, fractional allowed
    Seconds(f64),
    /// Humantime text such as `"4m 30s"` or `"1500ms"`
    Text(String),
}

impl DurationValue {
    /// Converts to a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the value is negative,
    /// non-finite, or unparsable. Zero is returned as-is; rejecting it is
    /// up to the caller.
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            Self::Seconds(secs) => seconds(*secs),
            Self::Text(text) => {
                let text = text.trim();
                if let Ok(secs) = text.parse::<f64>() {
                    return seconds(secs);
                }
                humantime::parse_duration(text).map_err(|e| format!("invalid duration '{text}': {e}"))
            }
        }
    }
}

impl From<Duration> for DurationValue {
    fn from(d: Duration) -> Self {
        if d.subsec_nanos() == 0 {
            Self::Text(humantime::format_duration(d).to_string())
        } else {
            Self::Seconds(d.as_secs_f64())
        }
    }
}

fn seconds(secs: f64) -> Result<Duration, String> {
    if !secs.is_finite() {
        return Err(format!("duration must be finite, got {secs}"));
    }
    if secs < 0.0 {
        return Err(format!("duration must not be negative, got {secs}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {secs}: {e}"))
}

// ============================================================================
// Display
// ============================================================================

/// The optional `display` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Render layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<DisplayMode>,

    /// Tick cadence while a phase counts down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_interval_ms: Option<u64>,

    /// Tick cadence while idle, paused, or completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_interval_ms: Option<u64>,

    /// Ring the terminal bell on warning cues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bell: Option<bool>,
}

/// Render layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Title, phase list, and progress bars
    #[default]
    Full,
    /// One line rewritten in place
    Compact,
    /// One JSON object per change on stdout
    Json,
}

// ============================================================================
// Conversion
// ============================================================================

impl ClockConfig {
    /// Builds the strict schedule from this configuration.
    ///
    /// Run the [`Validator`](super::Validator) first for a full report; this
    /// stops at the first problem.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] for any duration or index the schedule
    /// rejects.
    pub fn to_schedule(&self) -> Result<Schedule, ScheduleError> {
        let schedule = &self.schedule;
        let phases = schedule
            .phases
            .iter()
            .enumerate()
            .map(|(index, p)| {
                p.duration
                    .to_duration()
                    .map(|d| PhaseSpec::new(p.kind, d, p.label.clone()))
                    .map_err(|_| ScheduleError::NonPositiveDuration {
                        index,
                        label: p.label.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let threshold = match &schedule.warning_seconds {
            Some(value) => value
                .to_duration()
                .map_err(|_| ScheduleError::ZeroWarningThreshold)?,
            None => DEFAULT_WARNING_THRESHOLD,
        };

        Schedule::new(
            schedule.name.clone(),
            phases,
            schedule.boss_pause_after,
            threshold,
        )
    }

    /// Describes an existing schedule as a configuration file.
    #[must_use]
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let warning_seconds = (schedule.warning_threshold() != DEFAULT_WARNING_THRESHOLD)
            .then(|| schedule.warning_threshold().into());

        Self {
            schedule: ScheduleConfig {
                name: schedule.name().to_string(),
                boss_pause_after: schedule.boss_pause_after(),
                warning_seconds,
                phases: schedule
                    .phases()
                    .iter()
                    .map(|p| PhaseConfig {
                        label: p.label.clone(),
                        kind: p.kind,
                        duration: p.duration.into(),
                    })
                    .collect(),
            },
            display: None,
        }
    }
}
