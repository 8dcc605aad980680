//! `validate` command handler
//!
//! Runs every file through the full loading pipeline and reports all
//! problems found, without starting a timer.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, Severity, StormclockError, ValidationIssue};
use crate::render::format_clock;

/// Outcome of validating one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phases: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_secs: Option<f64>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validates schedule files without running them.
///
/// # Errors
///
/// Returns the first failure after every file has been reported. With
/// `--strict`, warnings count as failures.
pub fn validate(args: &ValidateArgs) -> Result<(), StormclockError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<StormclockError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let (report, failure) = check_file(&loader, path, args.strict);
        if first_failure.is_none() {
            first_failure = failure;
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
    }

    first_failure.map_or(Ok(()), Err)
}

fn check_file(
    loader: &ConfigLoader,
    path: &Path,
    strict: bool,
) -> (FileReport, Option<StormclockError>) {
    let mut report = FileReport {
        file: path.to_path_buf(),
        valid: false,
        schedule: None,
        phases: None,
        total_secs: None,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let loaded = match loader.load(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            report.errors = match &e {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(ToString::to_string).collect()
                }
                other => vec![other.to_string()],
            };
            return (report, Some(e.into()));
        }
    };

    report.schedule = Some(loaded.schedule.name().to_string());
    report.phases = Some(loaded.schedule.len());
    report.total_secs = Some(loaded.schedule.total_duration().as_secs_f64());
    report.warnings = loaded.warnings.iter().map(ToString::to_string).collect();

    if strict && !loaded.warnings.is_empty() {
        let errors = loaded
            .warnings
            .iter()
            .map(|w| ValidationIssue {
                path: w.location.clone().unwrap_or_default(),
                message: w.message.clone(),
                severity: Severity::Error,
            })
            .collect();
        let failure = ConfigError::ValidationError {
            path: path.display().to_string(),
            errors,
        };
        return (report, Some(failure.into()));
    }

    report.valid = true;
    tracing::info!(file = %path.display(), "configuration valid");
    (report, None)
}

fn print_human(report: &FileReport) {
    let file = report.file.display();
    if report.valid {
        let total = report
            .total_secs
            .map(std::time::Duration::from_secs_f64)
            .unwrap_or_default();
        println!(
            "✓ {file}: '{}' ({} phases, {} total)",
            report.schedule.as_deref().unwrap_or_default(),
            report.phases.unwrap_or_default(),
            format_clock(total),
        );
    } else {
        println!("✗ {file}");
    }
    for error in &report.errors {
        println!("    {error}");
    }
    for warning in &report.warnings {
        println!("    warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r"
schedule:
  name: quick
  boss_pause_after: 0
  phases:
    - { label: A, kind: safe, duration: 10 }
    - { label: B, kind: closing, duration: 10 }
";

    const WITH_WARNING: &str = r"
schedule:
  name: quick
  boss_pause_after: 1
  phases:
    - { label: A, kind: safe, duration: 10 }
    - { label: B, kind: closing, duration: 10 }
";

    #[test]
    fn test_valid_file() {
        let file = write_config(VALID);
        let (report, failure) = check_file(&ConfigLoader::with_defaults(), file.path(), false);
        assert!(report.valid);
        assert!(failure.is_none());
        assert_eq!(report.phases, Some(2));
        assert_eq!(report.schedule.as_deref(), Some("quick"));
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let file = write_config(WITH_WARNING);
        let loader = ConfigLoader::with_defaults();

        let (report, failure) = check_file(&loader, file.path(), false);
        assert!(report.valid);
        assert!(failure.is_none());
        assert!(!report.warnings.is_empty());

        let (report, failure) = check_file(&loader, file.path(), true);
        assert!(!report.valid);
        assert!(matches!(
            failure,
            Some(StormclockError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let (report, failure) = check_file(
            &ConfigLoader::with_defaults(),
            Path::new("/nonexistent/storm.yaml"),
            false,
        );
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(failure.is_some());
    }

    #[test]
    fn test_validate_reports_first_failure() {
        let good = write_config(VALID);
        let args = ValidateArgs {
            files: vec![
                good.path().to_path_buf(),
                PathBuf::from("/nonexistent/storm.yaml"),
            ],
            format: OutputFormat::Json,
            strict: false,
        };
        let err = validate(&args).unwrap_err();
        assert!(matches!(
            err,
            StormclockError::Config(ConfigError::MissingFile { .. })
        ));
    }
}
