//! CLI argument definitions
//!
//! All Clap derive structs for `stormclock` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::DisplayMode;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Storm phase countdown timer with boss-fight pause and closing-ring warnings.
#[derive(Parser, Debug)]
#[command(name = "stormclock", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "STORMCLOCK_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the countdown timer.
    Run(RunArgs),

    /// Validate schedule files without running them.
    Validate(ValidateArgs),

    /// List or print the built-in schedules.
    Presets(PresetsArgs),

    /// Show the leveling rune cost table.
    Runes(RunesArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Run
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("source").multiple(false))]
pub struct RunArgs {
    /// Path to a YAML schedule file.
    #[arg(short, long, group = "source", env = "STORMCLOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of a built-in schedule (default: nightreign).
    #[arg(short, long, group = "source", env = "STORMCLOCK_PRESET")]
    pub preset: Option<String>,

    /// Render layout (overrides the file's display.mode).
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Run every phase this many times faster.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Tick cadence while a phase counts down, in milliseconds.
    #[arg(long)]
    pub running_interval_ms: Option<u64>,

    /// Tick cadence while idle, paused, or completed, in milliseconds.
    #[arg(long)]
    pub idle_interval_ms: Option<u64>,

    /// Do not ring the terminal bell on warning cues.
    #[arg(long)]
    pub no_bell: bool,

    /// Start the first phase immediately.
    #[arg(long)]
    pub autostart: bool,

    /// Exit once the final phase ends.
    #[arg(long)]
    pub exit_on_complete: bool,

    /// Do not read triggers from stdin.
    #[arg(long)]
    pub no_stdin: bool,

    /// Write structured JSONL events to this file.
    #[arg(long, env = "STORMCLOCK_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Serve Prometheus metrics on 127.0.0.1:PORT.
    #[arg(long)]
    pub metrics_port: Option<u16>,
}

// ============================================================================
// Validate / Presets
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schedule files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `presets`.
#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Print the YAML of one preset instead of listing them.
    #[arg(long, value_name = "NAME")]
    pub show: Option<String>,
}

/// Arguments for `runes`.
#[derive(Args, Debug)]
pub struct RunesArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Show only the row for this level.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(crate::runes::MAX_LEVEL)))]
    pub level: Option<u32>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

impl ColorChoice {
    /// Resolves the choice for a stream.
    ///
    /// `Auto` enables color only on a terminal and only when `NO_COLOR` is
    /// unset.
    #[must_use]
    pub fn enabled_for(self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
