//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Chat completion providers (OpenAI-compatible, mock)
//! - `registry` - Tool registries (HTTP, in-memory, lazy)

pub mod ai;
pub mod registry;
