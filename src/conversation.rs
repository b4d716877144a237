//! In-memory conversation history
//!
//! An append-only log of turns owned by a chat session. Past turns are never
//! mutated; callers only get read-only views or owned snapshots.

#[cfg(test)]
mod proptests;

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Human,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only log of turns
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an assistant greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.append(Turn::assistant(greeting));
        store
    }

    /// Append a turn to the end of the log
    pub fn append(&mut self, turn: Turn) {
        debug_assert!(
            turn.role == Role::Human || !turn.content.is_empty(),
            "assistant turns must carry text"
        );
        self.turns.push(turn);
    }

    /// Snapshot of every turn except the most recent one.
    ///
    /// This is the history sent alongside a new query; the query itself
    /// travels in its own field, so the just-appended human turn is left out.
    pub fn context_prefix(&self) -> Vec<Turn> {
        match self.turns.split_last() {
            Some((_, prefix)) => prefix.to_vec(),
            None => Vec::new(),
        }
    }

    /// The most recently appended turn
    pub fn latest(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
