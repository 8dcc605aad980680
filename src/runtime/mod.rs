//! Runtime
//!
//! The driver loop that owns the timer, plus the input sources that feed it.

pub mod driver;
pub mod input;

pub use driver::{
    DEFAULT_IDLE_INTERVAL, DEFAULT_RUNNING_INTERVAL, Driver, DriverConfig, RunReport, TimerCommand,
};
#[cfg(unix)]
pub use input::spawn_signal_trigger;
pub use input::{forward_lines, parse_line, spawn_stdin};
