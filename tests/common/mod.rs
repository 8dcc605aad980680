//! Shared integration-test harness for running the `stormclock` binary,
//! either to completion or as a child process fed over stdin.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

/// Default timeout for reading one frame from the timer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path to the compiled binary.
pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_stormclock")
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary to completion with stdin closed.
#[allow(clippy::missing_panics_doc)]
pub fn run_command(args: &[&str]) -> Output {
    std::process::Command::new(bin())
        .args(args)
        .env_remove("STORMCLOCK_CONFIG")
        .env_remove("STORMCLOCK_PRESET")
        .env_remove("STORMCLOCK_EVENTS_FILE")
        .env("STORMCLOCK_COLOR", "never")
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run stormclock")
}

/// Parses every non-empty stdout line as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
        .collect()
}

/// A running timer in JSON mode with helpers for stdin triggers.
///
/// The child process is killed on drop via `kill_on_drop(true)`.
pub struct StormclockProcess {
    child: Child,
    stdin: Option<tokio::process::ChildStdin>,
    reader: BufReader<tokio::process::ChildStdout>,
}

impl StormclockProcess {
    /// Spawns `stormclock run --mode json --quiet` plus `args`.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(args: &[&str]) -> Self {
        let mut child = Command::new(bin())
            .args(["run", "--mode", "json", "--no-bell", "--quiet"])
            .args(args)
            .env_remove("STORMCLOCK_CONFIG")
            .env_remove("STORMCLOCK_PRESET")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn stormclock");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin: Some(stdin),
            reader: BufReader::new(stdout),
        }
    }

    /// Writes one line to the timer's stdin.
    #[allow(clippy::missing_panics_doc)]
    pub async fn send_line(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write to stdin");
        stdin.flush().await.expect("flush stdin");
    }

    /// Sends a trigger (an empty line).
    pub async fn trigger(&mut self) {
        self.send_line("").await;
    }

    /// Closes stdin.
    pub fn close_stdin(&mut self) {
        self.stdin = None;
    }

    /// Reads one JSON frame.
    ///
    /// Panics on EOF, I/O error, or if no frame arrives within `timeout`.
    #[allow(clippy::missing_panics_doc)]
    pub async fn read_frame(&mut self, timeout: Duration) -> Value {
        let mut line = String::new();
        tokio::time::timeout(timeout, async {
            loop {
                line.clear();
                let n = self
                    .reader
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                assert!(n > 0, "unexpected EOF from stormclock");
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return serde_json::from_str::<Value>(trimmed)
                        .unwrap_or_else(|e| panic!("bad JSON frame {trimmed:?}: {e}"));
                }
            }
        })
        .await
        .expect("timed out waiting for a frame")
    }

    /// Reads frames until one has the given status, returning it.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait_for_status(&mut self, status: &str) -> Value {
        let deadline = tokio::time::Instant::now() + DEFAULT_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            assert!(!remaining.is_zero(), "status {status} never appeared");
            let frame = self.read_frame(remaining).await;
            if frame["status"] == status {
                return frame;
            }
        }
    }

    /// Waits for the process to exit and returns its exit code.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait(mut self) -> Option<i32> {
        let status = tokio::time::timeout(DEFAULT_TIMEOUT, self.child.wait())
            .await
            .expect("stormclock did not exit")
            .expect("wait failed");
        status.code()
    }
}
