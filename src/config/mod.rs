//! Configuration module
//!
//! Loads and validates schedule files and the built-in presets, producing
//! the frozen [`Schedule`](crate::phase::Schedule) a run uses.

pub mod loader;
pub mod presets;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use presets::{
    BuiltinPreset, DEFAULT_PRESET, find_preset, list_preset_names, list_presets, load_preset,
    suggest_preset,
};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
