//! Configuration validation
//!
//! Semantic checks on a deserialized [`ClockConfig`]. Validation collects
//! ALL issues rather than stopping at the first, so a user fixing a
//! schedule file sees everything wrong with it in one pass.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::loader::ConfigLimits;
use crate::config::schema::{ClockConfig, DisplayConfig, PhaseConfig};
use crate::error::{Severity, ValidationIssue};
use crate::phase::{DEFAULT_WARNING_THRESHOLD, MAX_PHASE_DURATION, PhaseKind};

/// Accepted range for `display.running_interval_ms`.
pub const RUNNING_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 50..=1000;

/// Accepted range for `display.idle_interval_ms`.
pub const IDLE_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 50..=5000;

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &ClockConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        let schedule = &config.schedule;

        if schedule.name.trim().is_empty() {
            self.add_error("schedule.name", "Schedule name is required and cannot be empty");
        }

        let durations = self.validate_phases(&schedule.phases, limits);
        self.validate_boss_pause(schedule.boss_pause_after, schedule.phases.len());
        self.validate_warning(config, &durations);

        if let Some(display) = &config.display {
            self.validate_display(display);
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Phases
    // ========================================================================

    /// Checks every phase and returns the durations that parsed cleanly.
    fn validate_phases(
        &mut self,
        phases: &[PhaseConfig],
        limits: &ConfigLimits,
    ) -> Vec<(PhaseKind, Duration)> {
        if phases.is_empty() {
            self.add_error("schedule.phases", "At least one phase is required");
            return Vec::new();
        }

        if phases.len() > limits.max_phases {
            self.add_error(
                "schedule.phases",
                &format!(
                    "Too many phases: {} (limit {})",
                    phases.len(),
                    limits.max_phases
                ),
            );
        }

        let mut seen = HashSet::new();
        let mut durations = Vec::with_capacity(phases.len());

        for (i, phase) in phases.iter().enumerate() {
            let path = format!("schedule.phases[{i}]");

            if phase.label.trim().is_empty() {
                self.add_warning(&format!("{path}.label"), "Phase label is empty");
            } else if !seen.insert(phase.label.as_str()) {
                self.add_warning(
                    &format!("{path}.label"),
                    &format!("Duplicate phase label '{}'", phase.label),
                );
            }

            match phase.duration.to_duration() {
                Ok(d) if d.is_zero() => {
                    self.add_error(&format!("{path}.duration"), "Duration must be positive");
                }
                Ok(d) if d > MAX_PHASE_DURATION => {
                    self.add_error(
                        &format!("{path}.duration"),
                        &format!(
                            "Duration {} exceeds the {} limit",
                            humantime::format_duration(d),
                            humantime::format_duration(MAX_PHASE_DURATION)
                        ),
                    );
                }
                Ok(d) => durations.push((phase.kind, d)),
                Err(message) => self.add_error(&format!("{path}.duration"), &message),
            }
        }

        durations
    }

    fn validate_boss_pause(&mut self, boss_pause_after: usize, len: usize) {
        if len == 0 {
            return;
        }
        if boss_pause_after >= len {
            self.add_error(
                "schedule.boss_pause_after",
                &format!("Index {boss_pause_after} is out of range (0..={})", len - 1),
            );
        } else if boss_pause_after == len - 1 {
            self.add_warning(
                "schedule.boss_pause_after",
                "Boss pause is on the final phase and will never be reached; \
                 the run completes instead",
            );
        }
    }

    fn validate_warning(&mut self, config: &ClockConfig, durations: &[(PhaseKind, Duration)]) {
        let threshold = match &config.schedule.warning_seconds {
            None => DEFAULT_WARNING_THRESHOLD,
            Some(value) => match value.to_duration() {
                Ok(d) if d.is_zero() => {
                    self.add_error(
                        "schedule.warning_seconds",
                        "Warning threshold must be positive",
                    );
                    return;
                }
                Ok(d) => d,
                Err(message) => {
                    self.add_error("schedule.warning_seconds", &message);
                    return;
                }
            },
        };

        let shortest_safe = durations
            .iter()
            .filter(|(kind, _)| kind.warns_before_end())
            .map(|(_, d)| *d)
            .min();
        if let Some(shortest) = shortest_safe
            && threshold >= shortest
        {
            self.add_warning(
                "schedule.warning_seconds",
                "Warning threshold is not shorter than every Safe phase; \
                 the cue fires as soon as such a phase starts",
            );
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    fn validate_display(&mut self, display: &DisplayConfig) {
        if let Some(ms) = display.running_interval_ms
            && !RUNNING_INTERVAL_RANGE_MS.contains(&ms)
        {
            self.add_error(
                "display.running_interval_ms",
                &format!(
                    "Interval {ms} ms is outside {}..={} ms",
                    RUNNING_INTERVAL_RANGE_MS.start(),
                    RUNNING_INTERVAL_RANGE_MS.end()
                ),
            );
        }
        if let Some(ms) = display.idle_interval_ms
            && !IDLE_INTERVAL_RANGE_MS.contains(&ms)
        {
            self.add_error(
                "display.idle_interval_ms",
                &format!(
                    "Interval {ms} ms is outside {}..={} ms",
                    IDLE_INTERVAL_RANGE_MS.start(),
                    IDLE_INTERVAL_RANGE_MS.end()
                ),
            );
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
