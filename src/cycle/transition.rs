//! Pure state transition function

use super::{CycleState, Effect, Event};
use crate::conversation::Turn;
use crate::stream::DisplayState;
use thiserror::Error;

/// Shown and recorded when the request or its body fails
pub const CONNECTION_ERROR_TEXT: &str =
    "Sorry, I couldn't reach the assistant. Please check your connection and try again.";

/// Shown and recorded when a reply ends without any usable text
pub const EMPTY_REPLY_TEXT: &str = "The assistant didn't send a reply. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CycleState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CycleState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still streaming; wait for it to finish")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(state: &CycleState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (CycleState::Idle, Event::Submit { query }) => {
            let query = query.trim();
            if query.is_empty() {
                return Ok(TransitionResult::new(CycleState::Idle));
            }

            let turn = Turn::human(query);
            Ok(TransitionResult::new(CycleState::Streaming { shown: None }).with_effects([
                Effect::SetInputEnabled(false),
                // Appended before the request so the prefix leaves it out
                Effect::AppendTurn(turn.clone()),
                Effect::ShowTurn(turn),
                Effect::BeginReply,
                Effect::RequestReply {
                    query: query.to_string(),
                },
            ]))
        }

        (CycleState::Streaming { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // ============================================================
        // Streaming
        // ============================================================
        (CycleState::Streaming { .. }, Event::Record { state }) => Ok(TransitionResult::new(
            CycleState::Streaming {
                shown: Some(state.clone()),
            },
        )
        .with_effect(Effect::UpdateReply(state))),

        (CycleState::Streaming { shown }, Event::StreamEnded) => {
            let (display, text) = settle(shown.as_ref());
            Ok(finish(display, text))
        }

        (CycleState::Streaming { .. }, Event::RequestFailed | Event::StreamFailed) => Ok(finish(
            DisplayState::Error(CONNECTION_ERROR_TEXT.to_string()),
            CONNECTION_ERROR_TEXT.to_string(),
        )),

        // ============================================================
        // Nothing in flight
        // ============================================================
        (CycleState::Idle, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} while idle"
        ))),
    }
}

/// Final display and stored text for a normally ended stream.
///
/// The stored turn is exactly what the reply last showed.
fn settle(shown: Option<&DisplayState>) -> (DisplayState, String) {
    match shown {
        Some(shown) if !shown.text().trim().is_empty() => (shown.clone(), shown.text().to_string()),
        _ => empty_reply(),
    }
}

fn empty_reply() -> (DisplayState, String) {
    (
        DisplayState::Error(EMPTY_REPLY_TEXT.to_string()),
        EMPTY_REPLY_TEXT.to_string(),
    )
}

fn finish(display: DisplayState, text: String) -> TransitionResult {
    TransitionResult::new(CycleState::Idle).with_effects([
        Effect::FinishReply(display),
        Effect::AppendTurn(Turn::assistant(text)),
        Effect::SetInputEnabled(true),
    ])
}
