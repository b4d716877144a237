//! Events that drive the submission cycle

use crate::stream::DisplayState;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Submit { query: String },

    // Transport events (the error itself is logged by the session)
    /// The request could not be sent or came back with a failure status
    RequestFailed,
    /// A frame was resolved (content, backend error or decode failure)
    Record { state: DisplayState },
    /// The body broke off mid-reply
    StreamFailed,
    /// The body ended normally
    StreamEnded,
}
