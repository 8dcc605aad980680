//! Error types for `stormclock`
//!
//! The phase timer itself has no runtime failure modes. Everything that can
//! go wrong happens before a run starts: reading and validating the schedule
//! configuration, or wiring up the process (I/O, metrics, CLI usage).

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes for `stormclock` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure, bad schedule)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, conflicting options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `stormclock` operations.
///
/// Aggregates the domain errors and maps each onto a process exit code.
#[derive(Debug, Error)]
pub enum StormclockError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Schedule construction error
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StormclockError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Schedule(_) | Self::Json(_) | Self::Yaml(_) => {
                ExitCode::CONFIG_ERROR
            }
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", summarize(.errors))]
    ValidationError {
        /// Path to the configuration file (or preset name)
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with `${VAR:?message}`
        location: String,
    },

    /// No built-in preset has the requested name
    #[error("unknown preset '{name}'{}", did_you_mean(.suggestion))]
    UnknownPreset {
        /// Requested preset name
        name: String,
        /// Closest known preset, if any is close enough
        suggestion: Option<String>,
    },
}

#[allow(clippy::ref_option)]
fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

fn summarize(errors: &[ValidationIssue]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "schedule.phases[2].duration")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Schedule Errors
// ============================================================================

/// Faults detected while constructing a [`Schedule`](crate::phase::Schedule).
///
/// These are fatal: a schedule that fails construction never reaches the
/// timer, so no run can discover them midway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The phase list is empty
    #[error("schedule has no phases")]
    Empty,

    /// A phase has a zero, negative, or non-finite duration
    #[error("phase {index} ('{label}') has a non-positive duration")]
    NonPositiveDuration {
        /// Index of the offending phase
        index: usize,
        /// Label of the offending phase
        label: String,
    },

    /// The boss pause index does not name a phase
    #[error("boss pause index {index} is outside 0..{len}")]
    BossPauseOutOfRange {
        /// Configured index
        index: usize,
        /// Number of phases
        len: usize,
    },

    /// The warning threshold is zero
    #[error("warning threshold must be positive")]
    ZeroWarningThreshold,

    /// The phase durations add up to more than a `Duration` can hold
    #[error("total schedule duration overflows")]
    TotalOverflow,

    /// A speed factor was zero, negative, or non-finite
    #[error("speed factor must be a positive finite number, got {0}")]
    InvalidSpeed(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `stormclock` operations.
pub type Result<T> = std::result::Result<T, StormclockError>;

// ============================================================================
// Tests
// ============================================================================
