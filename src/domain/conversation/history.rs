//! Conversation history - ordered, append-only sequence of turns.
//!
//! The caller owns its history value. The orchestrator works on a clone and
//! hands back a new value, so requests sharing a caller-side store never race
//! on the same history.

use serde::{Deserialize, Serialize};

use super::ConversationTurn;

/// Ordered, append-only list of conversation turns.
///
/// Insertion order is significant: the history is replayed verbatim into
/// every completion call.
///
/// # Examples
///
/// ```
/// use tool_relay::domain::conversation::{ConversationHistory, ConversationTurn};
///
/// let history = ConversationHistory::new()
///     .with_turn(ConversationTurn::user("show interfaces"))
///     .with_turn(ConversationTurn::assistant("Ethernet1 is up"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.last().unwrap().content(), "Ethernet1 is up");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Appends a turn, builder style.
    pub fn with_turn(mut self, turn: ConversationTurn) -> Self {
        self.push(turn);
        self
    }

    /// Returns the turns in insertion order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Iterates over turns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Returns the most recent turn.
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if there are no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl FromIterator<ConversationTurn> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = ConversationTurn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
