//! Immutable phase schedule.
//!
//! A [`Schedule`] is the validated, frozen phase sequence a
//! [`PhaseTimer`](super::PhaseTimer) runs through. Construction is the only
//! place configuration faults are detected; once built, every index the
//! timer can reach is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Warning window before the end of a Safe phase.
pub const DEFAULT_WARNING_THRESHOLD: Duration = Duration::from_secs(5);

/// Longest single phase a configuration may declare.
pub const MAX_PHASE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Whether a phase is a quiet interval or an active ring contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// No hazard is active. The warning cue fires near the end.
    Safe,
    /// The storm boundary is contracting.
    Closing,
}

impl PhaseKind {
    /// Returns the lowercase name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Closing => "closing",
        }
    }

    /// Returns `true` for kinds that raise the warning cue before they end.
    ///
    /// The cue announces the *next* ring closing, so it belongs to the
    /// Safe phase that precedes it rather than to the Closing phase itself.
    #[must_use]
    pub const fn warns_before_end(self) -> bool {
        matches!(self, Self::Safe)
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed segment of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSpec {
    /// Safe or Closing
    pub kind: PhaseKind,
    /// How long the phase counts down
    pub duration: Duration,
    /// Display label
    pub label: String,
}

impl PhaseSpec {
    /// Creates a phase specification.
    #[must_use]
    pub fn new(kind: PhaseKind, duration: Duration, label: impl Into<String>) -> Self {
        Self {
            kind,
            duration,
            label: label.into(),
        }
    }

    /// Creates a Safe phase.
    #[must_use]
    pub fn safe(label: impl Into<String>, duration: Duration) -> Self {
        Self::new(PhaseKind::Safe, duration, label)
    }

    /// Creates a Closing phase.
    #[must_use]
    pub fn closing(label: impl Into<String>, duration: Duration) -> Self {
        Self::new(PhaseKind::Closing, duration, label)
    }
}

/// A validated, immutable phase sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    name: String,
    phases: Vec<PhaseSpec>,
    boss_pause_after: usize,
    warning_threshold: Duration,
    total_duration: Duration,
}

impl Schedule {
    /// Builds a schedule, rejecting configurations a run could trip over.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::Empty`] when `phases` is empty
    /// - [`ScheduleError::NonPositiveDuration`] when a phase lasts zero time
    /// - [`ScheduleError::BossPauseOutOfRange`] when `boss_pause_after`
    ///   does not index a phase
    /// - [`ScheduleError::ZeroWarningThreshold`] when the warning window is zero
    /// - [`ScheduleError::TotalOverflow`] when the durations cannot be summed
    pub fn new(
        name: impl Into<String>,
        phases: Vec<PhaseSpec>,
        boss_pause_after: usize,
        warning_threshold: Duration,
    ) -> Result<Self, ScheduleError> {
        if phases.is_empty() {
            return Err(ScheduleError::Empty);
        }

        if let Some((index, phase)) = phases
            .iter()
            .enumerate()
            .find(|(_, p)| p.duration.is_zero())
        {
            return Err(ScheduleError::NonPositiveDuration {
                index,
                label: phase.label.clone(),
            });
        }

        if boss_pause_after >= phases.len() {
            return Err(ScheduleError::BossPauseOutOfRange {
                index: boss_pause_after,
                len: phases.len(),
            });
        }

        if warning_threshold.is_zero() {
            return Err(ScheduleError::ZeroWarningThreshold);
        }

        let total_duration = phases
            .iter()
            .try_fold(Duration::ZERO, |total, p| total.checked_add(p.duration))
            .ok_or(ScheduleError::TotalOverflow)?;

        Ok(Self {
            name: name.into(),
            phases,
            boss_pause_after,
            warning_threshold,
            total_duration,
        })
    }

    /// Returns a copy with every phase shortened by `speed`.
    ///
    /// A speed of `60.0` turns each minute into one second, which is handy
    /// for rehearsing a run without waiting half an hour.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSpeed`] for zero, negative, or
    /// non-finite factors and for factors that stretch a phase past what a
    /// [`Duration`] can hold. Returns [`ScheduleError::NonPositiveDuration`]
    /// if a phase would shrink below the clock resolution.
    pub fn scaled(&self, speed: f64) -> Result<Self, ScheduleError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ScheduleError::InvalidSpeed(speed.to_string()));
        }
        #[allow(clippy::float_cmp)]
        if speed == 1.0 {
            return Ok(self.clone());
        }

        let phases = self
            .phases
            .iter()
            .map(|p| {
                Duration::try_from_secs_f64(p.duration.as_secs_f64() / speed)
                    .map(|duration| PhaseSpec {
                        duration,
                        ..p.clone()
                    })
                    .map_err(|_| ScheduleError::InvalidSpeed(speed.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            self.name.clone(),
            phases,
            self.boss_pause_after,
            self.warning_threshold,
        )
    }

    /// Schedule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All phases, in run order.
    #[must_use]
    pub fn phases(&self) -> &[PhaseSpec] {
        &self.phases
    }

    /// Phase at `index`, if any.
    #[must_use]
    pub fn phase(&self, index: usize) -> Option<&PhaseSpec> {
        self.phases.get(index)
    }

    /// Number of phases (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always `false`; a schedule cannot be built without phases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Index of the phase after which the run suspends for the boss fight.
    #[must_use]
    pub const fn boss_pause_after(&self) -> usize {
        self.boss_pause_after
    }

    /// Remaining-time window that arms the warning cue.
    #[must_use]
    pub const fn warning_threshold(&self) -> Duration {
        self.warning_threshold
    }

    /// Sum of all phase durations.
    #[must_use]
    pub const fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Returns `true` when the boss pause can actually be reached.
    ///
    /// Completion takes precedence on the final phase, so a pause placed
    /// after it never happens.
    #[must_use]
    pub fn boss_pause_reachable(&self) -> bool {
        self.boss_pause_after + 1 < self.phases.len()
    }
}
