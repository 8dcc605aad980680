//! Command-line interface
//!
//! Argument parsing and command handlers for the `stormclock` binary.

pub mod args;
pub mod commands;
