//! Orchestrator - one user request through discovery, decision, execution and synthesis.
//!
//! ```text
//! AwaitingDecision ──(no call)──────────────────────────────────────────▶ Done
//!        │
//!        └──(call)──▶ Executing ──▶ AwaitingSynthesis ──▶ Done
//! ```
//!
//! Exactly one completion when the model answers directly, exactly two when
//! it asks for a tool.

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::catalog::{CatalogError, ToolCatalog};
use super::completion::CompletionClient;
use super::executor::ToolExecutor;
use super::prompts::PromptBuilder;
use crate::domain::conversation::{ConversationHistory, ConversationTurn, ToolCallParser};
use crate::domain::tools::ToolCall;
use crate::ports::{AIError, RequestMetadata};

/// Placeholder reported as the tool result when no tool ran.
pub const NO_TOOL_CALLED: &str = "(no tool called)";

/// Default number of tools offered to the model.
pub const DEFAULT_DISCOVERY_LIMIT: usize = 50;

/// Tuning for discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Fixed discovery query. `None` searches with the user's text.
    pub discovery_query: Option<String>,
    /// Maximum tools offered to the model.
    pub discovery_limit: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            discovery_query: None,
            discovery_limit: DEFAULT_DISCOVERY_LIMIT,
        }
    }
}

/// Errors that abort a request. The caller's history is left as it was.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Tool discovery failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A completion call failed.
    #[error("Completion failed: {0}")]
    Completion(#[from] AIError),
}

/// Everything produced by one request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Pretty JSON of the chosen call, or the raw reply when none was chosen.
    pub proposed_call: String,
    /// Tool payload or diagnostic, or [`NO_TOOL_CALLED`].
    pub tool_result: String,
    /// Answer to show the user.
    pub final_answer: String,
    /// History including this request's turns.
    pub history: ConversationHistory,
    /// The parsed call, if any.
    pub tool_call: Option<ToolCall>,
    /// Identifier carried in logs and completion metadata.
    pub request_id: Uuid,
}

impl QueryOutcome {
    /// Returns true if a tool was selected for this request.
    pub fn used_tool(&self) -> bool {
        self.tool_call.is_some()
    }
}

/// Drives one request from user text to final answer.
///
/// Holds no per-request state, so one instance can be shared across tasks
/// behind an `Arc`.
pub struct Orchestrator {
    catalog: ToolCatalog,
    prompts: PromptBuilder,
    completion: CompletionClient,
    parser: ToolCallParser,
    executor: ToolExecutor,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    /// Creates an orchestrator from its collaborators.
    pub fn new(
        catalog: ToolCatalog,
        completion: CompletionClient,
        executor: ToolExecutor,
    ) -> Self {
        Self {
            catalog,
            prompts: PromptBuilder::new(),
            completion,
            parser: ToolCallParser::new(),
            executor,
            settings: OrchestratorSettings::default(),
        }
    }

    /// Replaces the prompt builder.
    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Replaces the discovery settings.
    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the discovery settings.
    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Handles one user request against a copy of `history`.
    ///
    /// # Errors
    ///
    /// Returns an error when discovery or a completion call fails. Tool
    /// execution failures are not errors: they are reported in
    /// [`QueryOutcome::tool_result`] and explained by the model.
    pub async fn handle(
        &self,
        user_text: &str,
        history: &ConversationHistory,
    ) -> Result<QueryOutcome, OrchestratorError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("handle_request", %request_id);
        self.run(request_id, user_text, history).instrument(span).await
    }

    async fn run(
        &self,
        request_id: Uuid,
        user_text: &str,
        history: &ConversationHistory,
    ) -> Result<QueryOutcome, OrchestratorError> {
        let metadata = RequestMetadata::new(request_id.to_string());
        let query = self
            .settings
            .discovery_query
            .as_deref()
            .unwrap_or(user_text);

        let snapshot = self
            .catalog
            .discover(query, self.settings.discovery_limit)
            .await?;
        tracing::info!(tools = snapshot.len(), "Catalog ready");

        let mut history = history.clone();
        history.push(ConversationTurn::user(user_text));

        let decision_prompt = self.prompts.build_decision_prompt(&history, &snapshot);
        let reply = self
            .completion
            .complete(decision_prompt, metadata.clone())
            .await?;

        let Some((call, source)) = self.parser.extract_with_source(&reply) else {
            tracing::info!("Model answered without a tool");
            history.push(ConversationTurn::assistant(reply.clone()));
            return Ok(QueryOutcome {
                proposed_call: reply.clone(),
                tool_result: NO_TOOL_CALLED.to_string(),
                final_answer: reply,
                history,
                tool_call: None,
                request_id,
            });
        };

        tracing::info!(tool = call.tool_name(), ?source, "Model selected a tool");
        let proposed_call = call.to_pretty_json();
        history.push(ConversationTurn::assistant(proposed_call.clone()));

        let result = self.executor.execute(&call, &snapshot).await;

        let synthesis_prompt = self
            .prompts
            .build_synthesis_prompt(&history, result.payload());
        let final_answer = self.completion.complete(synthesis_prompt, metadata).await?;
        history.push(ConversationTurn::assistant(final_answer.clone()));

        tracing::info!(tool_ok = result.is_ok(), "Request complete");
        Ok(QueryOutcome {
            proposed_call,
            tool_result: result.into_payload(),
            final_answer,
            history,
            tool_call: Some(call),
            request_id,
        })
    }
}
