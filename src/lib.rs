//! `stormclock` - storm phase countdown timer
//!
//! This library provides the phase timer state machine behind the
//! `stormclock` binary: a fixed sequence of Safe and Closing phases, a
//! single pause for the boss fight, and a one-shot warning before each
//! ring starts to close.

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod observability;
pub mod phase;
pub mod render;
pub mod runes;
pub mod runtime;
