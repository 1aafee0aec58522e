//! Tool catalog - discovery of the tools offered to the model.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::tools::{compare_matches, Tool};
use crate::ports::{CallOptions, RegistryError, ToolRegistry};

/// Errors raised during discovery.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The registry failed to answer the search.
    #[error("Tool discovery failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Ordered, duplicate-free list of tools for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    tools: Vec<Tool>,
}

impl CatalogSnapshot {
    /// Creates a snapshot from tools, keeping the first tool of each name.
    pub fn from_tools(tools: impl IntoIterator<Item = Tool>) -> Self {
        let mut seen = HashSet::new();
        let tools = tools
            .into_iter()
            .filter(|tool| seen.insert(tool.name().to_string()))
            .collect();
        Self { tools }
    }

    /// Returns the tools in rank order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Resolves a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Returns the number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools were discovered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Serializes every tool with its full argument schema as a JSON array.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.tools).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Discovers tools through a [`ToolRegistry`].
#[derive(Clone)]
pub struct ToolCatalog {
    registry: Arc<dyn ToolRegistry>,
    timeout: Option<Duration>,
}

impl ToolCatalog {
    /// Creates a catalog over a registry.
    pub fn new(registry: Arc<dyn ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Sets the timeout applied to discovery calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Arc<dyn ToolRegistry> {
        &self.registry
    }

    /// Searches the registry and returns at most `limit` ranked, unique tools.
    ///
    /// Hits are ordered by score descending, then name ascending, so the
    /// result is stable for a fixed registry.
    pub async fn discover(&self, query: &str, limit: usize) -> Result<CatalogSnapshot, CatalogError> {
        let options = CallOptions {
            timeout: self.timeout,
        };
        let mut matches = self.registry.search_tools(query, limit, &options).await?;
        matches.sort_by(compare_matches);

        let mut snapshot = CatalogSnapshot::from_tools(matches.into_iter().map(|m| m.tool));
        snapshot.tools.truncate(limit);

        tracing::debug!(query, limit, discovered = snapshot.len(), "Discovered tools");
        Ok(snapshot)
    }
}
