//! Built-in schedule presets
//!
//! Curated schedules embedded in the binary at compile time, loaded through
//! the same pipeline as user files. Enables zero-configuration usage:
//! `stormclock run --preset nightreign`.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::config::loader::{ConfigLoader, LoadResult};
use crate::error::ConfigError;
use crate::phase::Schedule;

/// Preset used when neither `--config` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "nightreign";

// ============================================================================
// Types
// ============================================================================

/// A built-in schedule embedded in the binary.
pub struct BuiltinPreset {
    /// Unique identifier (kebab-case).
    pub name: &'static str,

    /// Short human-readable description.
    pub description: &'static str,

    /// Raw YAML content (embedded at compile time).
    pub yaml: &'static str,
}

impl std::fmt::Debug for BuiltinPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinPreset")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl BuiltinPreset {
    /// Loads this preset through the configuration pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded YAML is broken.
    pub fn load(&self) -> Result<LoadResult, ConfigError> {
        let source = format!("preset:{}", self.name);
        ConfigLoader::with_defaults().load_str(self.yaml, Path::new(&source))
    }
}

// ============================================================================
// Registry
// ============================================================================

static BUILTIN_PRESETS: LazyLock<Vec<BuiltinPreset>> = LazyLock::new(|| {
    vec![
        BuiltinPreset {
            name: "nightreign",
            description: "Two days of two storm rings each, boss pause after Day 1",
            yaml: include_str!("../../presets/nightreign.yaml"),
        },
        BuiltinPreset {
            name: "nightreign-day",
            description: "A single day of two storm rings, boss pause after the first",
            yaml: include_str!("../../presets/nightreign-day.yaml"),
        },
    ]
});

// ============================================================================
// Public API
// ============================================================================

/// Look up a preset by exact name.
#[must_use]
pub fn find_preset(name: &str) -> Option<&'static BuiltinPreset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

/// All presets in registry order.
#[must_use]
pub fn list_presets() -> &'static [BuiltinPreset] {
    &BUILTIN_PRESETS
}

/// All preset names in registry order.
#[must_use]
pub fn list_preset_names() -> Vec<&'static str> {
    BUILTIN_PRESETS.iter().map(|p| p.name).collect()
}

/// Suggest a similar preset name for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is at most 3.
#[must_use]
pub fn suggest_preset(input: &str) -> Option<String> {
    BUILTIN_PRESETS
        .iter()
        .map(|p| (p.name, strsim::damerau_levenshtein(input, p.name)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

/// Loads the schedule of the named preset.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] (with a suggestion when one is
/// close) if no preset has that name.
pub fn load_preset(name: &str) -> Result<Arc<Schedule>, ConfigError> {
    let preset = find_preset(name).ok_or_else(|| ConfigError::UnknownPreset {
        name: name.to_string(),
        suggestion: suggest_preset(name),
    })?;
    Ok(preset.load()?.schedule)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    use crate::phase::PhaseKind;

    #[test]
    fn all_builtin_presets_load_without_warnings() {
        for preset in list_presets() {
            let result = preset.load();
            assert!(
                result.is_ok(),
                "Built-in preset '{}' failed to load: {:?}",
                preset.name,
                result.err()
            );
            let result = result.unwrap();
            assert!(
                result.warnings.is_empty(),
                "Built-in preset '{}' has warnings: {:?}",
                preset.name,
                result.warnings
            );
            assert_eq!(result.schedule.name(), preset.name);
        }
    }

    #[test]
    fn no_duplicate_preset_names() {
        let names = list_preset_names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn builtin_presets_are_self_contained() {
        for preset in list_presets() {
            assert!(
                !preset.yaml.contains("${"),
                "Built-in preset '{}' references environment variables",
                preset.name
            );
        }
    }

    #[test]
    fn nightreign_matches_reference_schedule() {
        let schedule = load_preset("nightreign").unwrap();
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule.boss_pause_after(), 3);
        assert_eq!(schedule.warning_threshold(), Duration::from_secs(5));
        assert_eq!(schedule.total_duration(), Duration::from_secs(1680));

        let expected = [270, 180, 210, 180, 270, 180, 210, 180];
        for (phase, secs) in schedule.phases().iter().zip(expected) {
            assert_eq!(phase.duration, Duration::from_secs(secs));
        }
        assert_eq!(schedule.phases()[0].label, "Day 1: First Storm Safe");
        assert_eq!(schedule.phases()[7].label, "Day 2: Second Storm Closing");
        assert!(
            schedule
                .phases()
                .iter()
                .enumerate()
                .all(|(i, p)| (p.kind == PhaseKind::Safe) == (i % 2 == 0))
        );
    }

    #[test]
    fn nightreign_day_matches_single_day_window() {
        let schedule = load_preset("nightreign-day").unwrap();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.boss_pause_after(), 1);
        assert_eq!(schedule.total_duration(), Duration::from_secs(840));
        assert_eq!(schedule.phases()[1].label, "Phase 1 Ring Closing");
    }

    #[test]
    fn default_preset_exists() {
        assert!(find_preset(DEFAULT_PRESET).is_some());
    }

    #[test]
    fn unknown_preset_suggests_close_name() {
        match load_preset("nightrein") {
            Err(ConfigError::UnknownPreset { name, suggestion }) => {
                assert_eq!(name, "nightrein");
                assert_eq!(suggestion.as_deref(), Some("nightreign"));
            }
            other => panic!("Expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn unknown_preset_far_has_no_suggestion() {
        assert!(suggest_preset("xyzabc123").is_none());
    }
}
