//! Conversation domain module.
//!
//! Role-tagged turns, the caller-owned history they form, and extraction of
//! tool calls from model replies.

mod extractor;
mod history;
mod turn;

pub use extractor::{CallSource, ToolCallParser};
pub use history::ConversationHistory;
pub use turn::{ConversationTurn, Role};
