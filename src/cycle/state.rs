//! Cycle state types

use crate::stream::DisplayState;

/// Where the session is in its request/reply cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CycleState {
    /// Ready for a new query; input is enabled
    #[default]
    Idle,
    /// A request is in flight. `shown` is what the pending reply currently
    /// displays, `None` while it still shows the thinking placeholder.
    Streaming { shown: Option<DisplayState> },
}
