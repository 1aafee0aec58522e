//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Chat completion round trips
//! - `ToolRegistry` - Tool discovery and remote execution

mod ai_provider;
mod tool_registry;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage,
};
pub use tool_registry::{CallOptions, RegistryError, ToolRegistry};
