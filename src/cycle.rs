//! Submission cycle state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: one
//! query in, one streamed reply out, and exactly one assistant turn recorded.

mod effect;
mod event;
mod state;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::CycleState;
pub use transition::{transition, TransitionError};
