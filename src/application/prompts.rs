//! Prompt construction for the two completion phases.
//!
//! Phase 1 (decision) asks the model to either pick one tool and emit a JSON
//! call or answer directly. Phase 2 (synthesis) feeds the tool output back so
//! the model can answer the original request.

use super::catalog::CatalogSnapshot;
use crate::domain::conversation::{ConversationHistory, ConversationTurn, Role};
use crate::ports::Message;

/// Default instructions for the decision phase. The tool list is appended.
pub const DEFAULT_DECISION_INSTRUCTIONS: &str = "You are a careful network automation assistant.\n\
You have access to a set of remote tools. When a tool is needed, you MUST reply with ONLY a JSON object \
containing exactly two keys: 'tool_name' and 'arguments' (arguments must be a JSON object). No other text.\n\
Example: {\"tool_name\": \"netconf_tools.netconf_get_config\", \"arguments\": {\"host\": \"1.2.3.4\", \"source\": \"running\"}}\n\
If no tool is needed, answer the user directly in plain text.\n\n\
Here are the available tools (names, descriptions, and JSON argument schemas):\n";

/// Default instructions for the synthesis phase.
pub const DEFAULT_SYNTHESIS_INSTRUCTIONS: &str = "You are a helpful assistant. \
Use the provided tool output to answer the user's request concisely and clearly.\n\
If the tool failed, explain the error and suggest the next troubleshooting step.\n";

/// Builds the message lists sent to the completion model.
///
/// Pure: identical inputs always produce identical messages.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    decision_instructions: String,
    synthesis_instructions: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    /// Creates a builder with the default instruction texts.
    pub fn new() -> Self {
        Self {
            decision_instructions: DEFAULT_DECISION_INSTRUCTIONS.to_string(),
            synthesis_instructions: DEFAULT_SYNTHESIS_INSTRUCTIONS.to_string(),
        }
    }

    /// Overrides the decision instructions. The tool list is still appended.
    pub fn with_decision_instructions(mut self, text: impl Into<String>) -> Self {
        self.decision_instructions = text.into();
        self
    }

    /// Overrides the synthesis instructions.
    pub fn with_synthesis_instructions(mut self, text: impl Into<String>) -> Self {
        self.synthesis_instructions = text.into();
        self
    }

    /// Phase 1: system instructions with the tool list, then the history.
    ///
    /// The latest user turn must already be the last history element.
    pub fn build_decision_prompt(
        &self,
        history: &ConversationHistory,
        tools: &CatalogSnapshot,
    ) -> Vec<Message> {
        let system = format!("{}{}\n", self.decision_instructions, tools.to_prompt_json());

        std::iter::once(Message::system(system))
            .chain(history.iter().map(to_message))
            .collect()
    }

    /// Phase 2: synthesis instructions, the history, then the tool output.
    pub fn build_synthesis_prompt(
        &self,
        history: &ConversationHistory,
        tool_output: &str,
    ) -> Vec<Message> {
        let mut messages: Vec<Message> = std::iter::once(Message::system(
            self.synthesis_instructions.clone(),
        ))
        .chain(history.iter().map(to_message))
        .collect();

        messages.push(Message::user(format!(
            "Tool output:\n{}\n\nPlease answer the original request using this output.",
            tool_output
        )));
        messages
    }
}

fn to_message(turn: &ConversationTurn) -> Message {
    match turn.role() {
        Role::User => Message::user(turn.content()),
        Role::Assistant => Message::assistant(turn.content()),
    }
}
