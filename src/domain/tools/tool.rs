//! Tool descriptor - name, description and argument schema of a remote tool.

use serde::{Deserialize, Serialize};

/// A remotely invokable operation discovered from a registry.
///
/// Contains everything the completion model needs to choose the tool and
/// shape its arguments. The argument schema is carried verbatim and never
/// truncated.
///
/// # Examples
///
/// ```
/// use tool_relay::domain::tools::Tool;
///
/// let tool = Tool::new(
///     "get_config",
///     "Fetch the configuration of a device",
///     serde_json::json!({
///         "type": "object",
///         "required": ["host"],
///         "properties": {
///             "host": { "type": "string" },
///             "source": { "type": "string", "enum": ["running", "candidate"] }
///         }
///     }),
/// )
/// .with_tags(["netconf", "config"]);
///
/// assert_eq!(tool.name(), "get_config");
/// assert_eq!(tool.tags().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique name within a catalog (e.g., "netconf_tools.get_config")
    name: String,

    /// Human-readable description for the model
    description: String,

    /// JSON Schema for the arguments
    #[serde(alias = "inputs")]
    argument_schema: serde_json::Value,

    /// Keywords used for relevance ranking
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

impl Tool {
    /// Creates a new tool descriptor without tags.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        argument_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            argument_schema,
            tags: Vec::new(),
        }
    }

    /// Sets the ranking tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the argument schema.
    pub fn argument_schema(&self) -> &serde_json::Value {
        &self.argument_schema
    }

    /// Returns the ranking tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A registry search hit: a tool and its relevance score for the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMatch {
    pub tool: Tool,
    pub score: u32,
}

impl ToolMatch {
    pub fn new(tool: Tool, score: u32) -> Self {
        Self { tool, score }
    }
}
