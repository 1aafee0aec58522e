//! In-memory tool registry for testing.
//!
//! Tools are registered together with a closure that produces their response.
//! Searches use the same relevance ranking as the HTTP registry.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter is for
//! tests and local experiments only.
//!
//! # Example
//!
//! ```ignore
//! let registry = InMemoryToolRegistry::new()
//!     .with_tool(get_config_tool(), |args| Ok(json!({"host": args["host"], "config": "..."})))
//!     .with_tool(flaky_tool(), |_| Err(RegistryError::tool_failed(500, "device busy")));
//!
//! assert_eq!(registry.call_count(), 0);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::tools::{rank_tools, Tool, ToolMatch};
use crate::ports::{CallOptions, RegistryError, ToolRegistry};

/// Handler producing a tool's response from its arguments.
pub type ToolHandler =
    Arc<dyn Fn(&Map<String, Value>) -> Result<Value, RegistryError> + Send + Sync>;

/// A call received by the in-memory registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Tool name as requested.
    pub tool_name: String,
    /// Arguments as received.
    pub arguments: Map<String, Value>,
}

/// In-memory tool registry.
#[derive(Default)]
pub struct InMemoryToolRegistry {
    tools: Vec<Tool>,
    handlers: HashMap<String, ToolHandler>,
    fixed_matches: Option<Vec<ToolMatch>>,
    search_error: Option<RegistryError>,
    searches: AtomicUsize,
    calls: RwLock<Vec<RecordedCall>>,
}

impl InMemoryToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool and its handler.
    pub fn with_tool<F>(mut self, tool: Tool, handler: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<Value, RegistryError> + Send + Sync + 'static,
    {
        self.handlers
            .insert(tool.name().to_string(), Arc::new(handler));
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
        self
    }

    /// Returns exactly these hits from every search instead of ranking.
    ///
    /// Lets tests exercise unsorted or duplicated registry output.
    pub fn with_fixed_matches(mut self, matches: Vec<ToolMatch>) -> Self {
        self.fixed_matches = Some(matches);
        self
    }

    /// Makes every search fail with this error.
    pub fn with_search_error(mut self, error: RegistryError) -> Self {
        self.search_error = Some(error);
        self
    }

    // === Test Helpers ===

    /// Returns the number of searches performed.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Returns the number of tool calls received.
    pub fn call_count(&self) -> usize {
        self.calls
            .read()
            .expect("InMemoryToolRegistry: calls lock poisoned")
            .len()
    }

    /// Returns all tool calls received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .read()
            .expect("InMemoryToolRegistry: calls lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ToolRegistry for InMemoryToolRegistry {
    async fn search_tools(
        &self,
        query: &str,
        limit: usize,
        _options: &CallOptions,
    ) -> Result<Vec<ToolMatch>, RegistryError> {
        self.searches.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.search_error {
            return Err(error.clone());
        }
        if let Some(matches) = &self.fixed_matches {
            return Ok(matches.clone());
        }
        Ok(rank_tools(query, &self.tools, limit))
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        _options: &CallOptions,
    ) -> Result<Value, RegistryError> {
        self.calls
            .write()
            .expect("InMemoryToolRegistry: calls lock poisoned")
            .push(RecordedCall {
                tool_name: name.to_string(),
                arguments: arguments.clone(),
            });

        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))?;
        handler(arguments)
    }
}
