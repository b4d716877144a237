//! Effects produced by state transitions

use crate::conversation::Turn;
use crate::stream::DisplayState;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Enable or disable user input
    SetInputEnabled(bool),

    /// Append a turn to the conversation store
    AppendTurn(Turn),

    /// Show a turn the renderer has not drawn yet
    ShowTurn(Turn),

    /// Create the pending reply placeholder
    BeginReply,

    /// Replace what the pending reply shows
    UpdateReply(DisplayState),

    /// Settle the pending reply with its final state
    FinishReply(DisplayState),

    /// Send the query along with the store's current context prefix
    RequestReply { query: String },
}
