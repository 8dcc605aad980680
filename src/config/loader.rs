//! Configuration loader
//!
//! This module implements the configuration loading pipeline:
//! 1. Size limit check and UTF-8 BOM strip
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing and typed deserialization
//! 4. Validation (collecting every issue)
//! 5. Freeze into an `Arc<Schedule>`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::schema::{ClockConfig, DisplayConfig};
use crate::config::validation::Validator;
use crate::error::{ConfigError, Severity, ValidationIssue};
use crate::phase::Schedule;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub config_limits: ConfigLimits,
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of phases.
    pub max_phases: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_phases: env_or("STORMCLOCK_MAX_PHASES", 64),
            max_config_size: env_or("STORMCLOCK_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated, frozen schedule.
    pub schedule: Arc<Schedule>,

    /// Display preferences from the file, if any.
    pub display: DisplayConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
///
/// Handles the full pipeline from YAML text to a frozen [`Schedule`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required environment variable is unset
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let max = self.options.config_limits.max_config_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {max} bytes"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = raw.len(), "loading configuration");
        self.load_str(&raw, path)
    }

    /// Loads configuration text; `source` names it in errors and warnings.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file-system failures.
    pub fn load_str(&self, raw: &str, source: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let max = self.options.config_limits.max_config_size;
        if raw.len() > max {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{} bytes", raw.len()),
                expected: format!("at most {max} bytes"),
            });
        }

        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        // Stage 1: Environment variable substitution (before YAML parsing)
        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub.substitute(raw, source)?;
        warnings.extend(env_sub.warnings);

        if substituted.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: source.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        // Stage 2: YAML parsing into typed config
        let config: ClockConfig =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: source.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        // Stage 3: Validation
        let result = Validator::new().validate(&config, &self.options.config_limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: source.display().to_string(),
                errors: result.errors,
            });
        }
        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        // Stage 4: Freeze
        let schedule = config
            .to_schedule()
            .map_err(|e| ConfigError::ValidationError {
                path: source.display().to_string(),
                errors: vec![ValidationIssue {
                    path: "schedule".to_string(),
                    message: e.to_string(),
                    severity: Severity::Error,
                }],
            })?;

        Ok(LoadResult {
            schedule: Arc::new(schedule),
            display: config.display.unwrap_or_default(),
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text BEFORE parsing so substituted numbers keep their
/// YAML type.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset, with warning)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str, source_path: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = Self::parse_var_spec(&mut chars, source_path)?;
                    self.expand(spec, source_path, &mut result)?;
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    fn expand(
        &mut self,
        spec: VarSpec,
        source_path: &Path,
        out: &mut String,
    ) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(&spec.name) {
            out.push_str(&value);
            return Ok(());
        }
        match spec.fallback {
            Fallback::Default(default) => out.push_str(&default),
            Fallback::Required(message) => {
                return Err(ConfigError::EnvVarNotSet {
                    var: spec.name,
                    location: message,
                });
            }
            Fallback::None => self.warnings.push(LoadWarning {
                message: format!(
                    "Environment variable '{}' is not set, using empty string",
                    spec.name
                ),
                location: Some(source_path.display().to_string()),
            }),
        }
        Ok(())
    }

    /// Parses a variable specification from the text after `${`.
    fn parse_var_spec(chars: &mut Chars<'_>, source_path: &Path) -> Result<VarSpec, ConfigError> {
        let mut name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => {
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::None,
                    });
                }
                ':' => match chars.peek() {
                    Some('-') => {
                        chars.next();
                        let default = Self::read_until_close(chars, source_path)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Default(default),
                        });
                    }
                    Some('?') => {
                        chars.next();
                        let message = Self::read_until_close(chars, source_path)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Required(message),
                        });
                    }
                    _ => name.push(':'),
                },
                _ => name.push(c),
            }
        }

        Err(unclosed(source_path, &name))
    }

    /// Reads content until the matching `}`, honouring nested braces.
    fn read_until_close(chars: &mut Chars<'_>, source_path: &Path) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }

        Err(unclosed(source_path, &value))
    }
}

struct VarSpec {
    name: String,
    fallback: Fallback,
}

enum Fallback {
    None,
    Default(String),
    Required(String),
}

fn unclosed(source_path: &Path, fragment: &str) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::from(source_path),
        line: None,
        message: format!("Unclosed environment variable reference: ${{{fragment}"),
    }
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
