//! Trait abstractions for the presentation side
//!
//! The session only talks to the screen through [`Renderer`], so the whole
//! cycle can be tested with a recording implementation.

use crate::conversation::Turn;
use crate::stream::DisplayState;

/// Token for a pending reply placeholder.
///
/// Returned by [`Renderer::begin_reply`] and handed back on every update, so
/// the renderer never has to search its own output for the placeholder.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ReplyHandle(u64);

impl ReplyHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Presentation collaborator for a chat session
pub trait Renderer {
    /// Draw a completed turn (the greeting, or the user's own query)
    fn show_turn(&mut self, turn: &Turn);

    /// Show a "thinking" placeholder for the reply and return its handle
    fn begin_reply(&mut self) -> ReplyHandle;

    /// Replace what the placeholder shows
    fn update_reply(&mut self, reply: &ReplyHandle, state: &DisplayState);

    /// Settle the placeholder; no further updates follow for this handle
    fn finish_reply(&mut self, reply: ReplyHandle, state: &DisplayState);

    /// Enable or disable user input
    fn set_input_enabled(&mut self, enabled: bool);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn show_turn(&mut self, turn: &Turn) {
        (**self).show_turn(turn);
    }

    fn begin_reply(&mut self) -> ReplyHandle {
        (**self).begin_reply()
    }

    fn update_reply(&mut self, reply: &ReplyHandle, state: &DisplayState) {
        (**self).update_reply(reply, state);
    }

    fn finish_reply(&mut self, reply: ReplyHandle, state: &DisplayState) {
        (**self).finish_reply(reply, state);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        (**self).set_input_enabled(enabled);
    }
}
