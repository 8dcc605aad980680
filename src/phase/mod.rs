//! Phase timer
//!
//! The core of `stormclock`: an immutable [`Schedule`] of Safe and Closing
//! phases, the mutable [`RunState`] of one run through it, and the
//! [`PhaseTimer`] state machine that turns triggers and ticks into phase
//! transitions and warning cues.

pub mod schedule;
pub mod state;
pub mod timer;
pub mod view;

pub use schedule::{DEFAULT_WARNING_THRESHOLD, MAX_PHASE_DURATION, PhaseKind, PhaseSpec, Schedule};
pub use state::{RunState, RunStatus};
pub use timer::{PhaseTimer, PhaseTransition, TickOutcome, TriggerOutcome, WarningCue};
pub use view::TimerView;
