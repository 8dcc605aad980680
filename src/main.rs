//! `stormclock` - storm phase countdown timer

use clap::Parser;
use tokio_util::sync::CancellationToken;

use stormclock::cli::args::Cli;
use stormclock::cli::commands;
use stormclock::error::ExitCode;
use stormclock::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    let cancel = CancellationToken::new();

    // First signal stops the timer cleanly, the second exits immediately
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let code = wait_for_signal().await;
        shutdown.cancel();
        eprintln!("\nShutting down... (press Ctrl+C again to force)");
        wait_for_signal().await;
        std::process::exit(code);
    });

    let result = commands::dispatch(cli, cancel).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// Waits for SIGINT or SIGTERM and returns the matching exit code.
#[cfg(unix)]
async fn wait_for_signal() -> i32 {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
                _ = sigterm.recv() => ExitCode::TERMINATED,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            ExitCode::INTERRUPTED
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> i32 {
    let _ = tokio::signal::ctrl_c().await;
    ExitCode::INTERRUPTED
}
