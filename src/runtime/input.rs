//! Input sources
//!
//! Each source runs on its own task and only ever sends [`TimerCommand`]s.
//! A source stopping (stdin EOF, for example) never stops the driver; the
//! driver only sees closed input once every sender is gone.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::driver::TimerCommand;

/// Maps one line of user input to a command.
///
/// `q`, `quit`, and `exit` stop the timer; every other line, including an
/// empty one, is a trigger.
#[must_use]
pub fn parse_line(line: &str) -> TimerCommand {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => TimerCommand::Quit,
        _ => TimerCommand::Trigger,
    }
}

/// Forwards commands read line by line from `reader` until EOF, a quit
/// request, cancellation, or the driver going away.
///
/// Returns the number of commands sent.
///
/// # Errors
///
/// Returns an I/O error if reading fails.
pub async fn forward_lines<R>(
    reader: R,
    commands: &mpsc::Sender<TimerCommand>,
    cancel: &CancellationToken,
) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut sent = 0;
    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("input reached EOF");
            break;
        };
        let command = parse_line(&line);
        if commands.send(command).await.is_err() {
            debug!("driver gone, input source stopping");
            break;
        }
        sent += 1;
        if command == TimerCommand::Quit {
            break;
        }
    }
    Ok(sent)
}

/// Spawns the stdin reader.
pub fn spawn_stdin(
    commands: mpsc::Sender<TimerCommand>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reader = BufReader::new(tokio::io::stdin());
        if let Err(e) = forward_lines(reader, &commands, &cancel).await {
            warn!(error = %e, "stdin input failed");
        }
    })
}

/// Spawns a task that turns every `SIGUSR1` into a trigger.
///
/// # Errors
///
/// Returns an I/O error if the signal handler cannot be registered.
#[cfg(unix)]
pub fn spawn_signal_trigger(
    commands: mpsc::Sender<TimerCommand>,
    cancel: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut usr1 = signal(SignalKind::user_defined1())?;
    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                received = usr1.recv() => {
                    if received.is_none() {
                        break;
                    }
                    debug!("SIGUSR1 received");
                    if commands.send(TimerCommand::Trigger).await.is_err() {
                        break;
                    }
                }
            }
        }
    }))
}
