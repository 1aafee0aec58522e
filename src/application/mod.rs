//! Application layer - request orchestration over the ports.
//!
//! Components, leaf to root:
//!
//! - `ToolCatalog` - Discovers and ranks the tools offered to the model
//! - `PromptBuilder` - Builds the decision and synthesis prompts
//! - `CompletionClient` - One completion round trip
//! - `ToolExecutor` - Runs a parsed call, containing failures
//! - `Orchestrator` - Ties the above together for one user request

mod catalog;
mod completion;
mod executor;
mod orchestrator;
mod prompts;

pub use catalog::{CatalogError, CatalogSnapshot, ToolCatalog};
pub use completion::{CompletionClient, DEFAULT_TEMPERATURE};
pub use executor::ToolExecutor;
pub use orchestrator::{
    Orchestrator, OrchestratorError, OrchestratorSettings, QueryOutcome, DEFAULT_DISCOVERY_LIMIT,
    NO_TOOL_CALLED,
};
pub use prompts::{PromptBuilder, DEFAULT_DECISION_INSTRUCTIONS, DEFAULT_SYNTHESIS_INSTRUCTIONS};
