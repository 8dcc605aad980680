//! Logging initialization for `stormclock`.
//!
//! Structured logging via `tracing` with human-readable and JSON output
//! formats. `-v` raises the level of stormclock's own targets only, so the
//! metrics exporter and the runtime stay at `warn` unless
//! `STORMCLOCK_LOG_LEVEL` asks for more. Logs always go to stderr; stdout
//! belongs to the renderer.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full filter directive.
pub const LOG_LEVEL_ENV: &str = "STORMCLOCK_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Level applied to stormclock targets for a `-v` count (saturates at trace).
#[must_use]
pub const fn verbosity_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Chooses the filter directive.
///
/// A non-blank `env_directive` that parses as a filter wins. Otherwise the
/// verbosity level is scoped to the `stormclock` target.
#[must_use]
pub fn filter_directive(env_directive: Option<&str>, verbosity: u8) -> String {
    if let Some(directive) = env_directive.map(str::trim).filter(|d| !d.is_empty())
        && EnvFilter::try_new(directive).is_ok()
    {
        return directive.to_string();
    }
    match verbosity {
        0 => "warn".to_string(),
        v => format!("warn,stormclock={}", verbosity_level(v)),
    }
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()` so a second call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let env_directive = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = EnvFilter::new(filter_directive(env_directive.as_deref(), verbosity));

    let show_target = verbosity >= 2;
    let use_ansi = color.enabled_for(std::io::stderr().is_terminal());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_directive_overrides_verbosity() {
        assert_eq!(filter_directive(Some("debug"), 0), "debug");
        assert_eq!(
            filter_directive(Some(" stormclock::runtime=trace "), 3),
            "stormclock::runtime=trace"
        );
    }

    #[test]
    fn test_blank_or_invalid_env_directive_ignored() {
        assert_eq!(filter_directive(Some(""), 1), "warn,stormclock=info");
        assert_eq!(filter_directive(Some("   "), 0), "warn");
        assert_eq!(
            filter_directive(Some("stormclock=loud"), 2),
            "warn,stormclock=debug"
        );
    }

    #[test]
    fn test_verbosity_scoped_to_crate() {
        assert_eq!(filter_directive(None, 0), "warn");
        assert_eq!(filter_directive(None, 1), "warn,stormclock=info");
        assert_eq!(filter_directive(None, 9), "warn,stormclock=trace");
        assert_eq!(verbosity_level(255), "trace");
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(LogFormat::Json, 3, ColorChoice::Never);
        init_logging(LogFormat::Human, 0, ColorChoice::Auto);
    }
}
