//! Tool Registry Port - Interface for discovering and invoking remote tools.
//!
//! A registry publishes a catalog of tools and executes calls against them.
//! The application layer only ever talks to this trait; the HTTP transport,
//! the in-memory test double and the lazy single-flight wrapper all live in
//! `adapters::registry`.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use tool_relay::ports::{CallOptions, RegistryError, ToolRegistry};
//!
//! struct StaticRegistry { /* ... */ }
//!
//! #[async_trait]
//! impl ToolRegistry for StaticRegistry {
//!     async fn search_tools(
//!         &self,
//!         query: &str,
//!         limit: usize,
//!         options: &CallOptions,
//!     ) -> Result<Vec<ToolMatch>, RegistryError> {
//!         // 1. Score every known tool against the query
//!         // 2. Return at most `limit` hits
//!     }
//!     // ... call_tool
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::tools::ToolMatch;

/// Port for tool discovery and remote execution.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Search the registry for tools relevant to `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text relevance query
    /// * `limit` - Maximum number of hits to return
    /// * `options` - Per-call options (timeout)
    ///
    /// Ordering of the returned hits is not guaranteed; callers re-rank.
    async fn search_tools(
        &self,
        query: &str,
        limit: usize,
        options: &CallOptions,
    ) -> Result<Vec<ToolMatch>, RegistryError>;

    /// Invoke a tool by exact name with a JSON object of arguments.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The tool's response body
    /// * `Err(RegistryError)` - Unknown tool, transport failure or tool-side error
    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        options: &CallOptions,
    ) -> Result<Value, RegistryError>;
}

/// Options applied to a single registry call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Timeout for the call; `None` uses the adapter default.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Creates options with a timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Errors raised by tool registries.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Registry could not be reached or initialized.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Call exceeded its timeout.
    #[error("Registry call timed out after {0:?}")]
    Timeout(Duration),

    /// No tool with this name is published.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The tool responded with an error status.
    #[error("Tool failed with status {status}: {body}")]
    ToolFailed {
        /// HTTP status (or equivalent) reported by the tool.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The tool manual could not be understood.
    #[error("Invalid tool manual: {0}")]
    InvalidManual(String),
}

impl RegistryError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a tool failure error.
    pub fn tool_failed(status: u16, body: impl Into<String>) -> Self {
        Self::ToolFailed {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_options_default_has_no_timeout() {
        assert_eq!(CallOptions::default().timeout, None);
        assert_eq!(
            CallOptions::with_timeout(Duration::from_secs(3)).timeout,
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn registry_error_displays_correctly() {
        assert_eq!(
            RegistryError::ToolNotFound("get_config".into()).to_string(),
            "Tool not found: get_config"
        );
        assert_eq!(
            RegistryError::tool_failed(500, "boom").to_string(),
            "Tool failed with status 500: boom"
        );
    }
}
