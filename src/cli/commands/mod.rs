//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod presets;
pub mod run;
pub mod runes;
pub mod validate;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::error::StormclockError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` is fired on SIGINT/SIGTERM and stops a running timer cleanly.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), StormclockError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cli.color, cancel).await,
        Commands::Validate(args) => validate::validate(&args),
        Commands::Presets(args) => presets::presets(&args),
        Commands::Runes(args) => runes::runes(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
