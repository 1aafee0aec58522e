//! Tool call and execution result value objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured request to invoke a tool, extracted from model output.
///
/// Only the tool call parser constructs these, which guarantees that
/// `arguments` is always a JSON object.
///
/// Serializes as `{"tool_name": ..., "arguments": {...}}`, the same shape the
/// model is asked to produce. There is no `Deserialize`: model output goes
/// through the parser.
///
/// ```compile_fail
/// use tool_relay::domain::tools::ToolCall;
///
/// let call: ToolCall =
///     serde_json::from_str(r#"{"tool_name": "t", "arguments": {}}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCall {
    /// Name of the tool to invoke
    tool_name: String,

    /// Arguments for the tool
    arguments: Map<String, Value>,
}

impl ToolCall {
    pub(crate) fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Builds a call from a parsed JSON value.
    ///
    /// Returns `None` unless the value is an object holding a string
    /// `tool_name` and an object `arguments`.
    pub(crate) fn from_json(value: Value) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };

        let tool_name = match object.remove("tool_name")? {
            Value::String(name) => name,
            _ => return None,
        };

        match object.remove("arguments")? {
            Value::Object(arguments) => Some(Self::new(tool_name, arguments)),
            _ => None,
        }
    }

    /// Returns the tool name.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Renders the call as indented JSON, as recorded in history.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(
                "{{\"tool_name\": {:?}, \"arguments\": {}}}",
                self.tool_name,
                Value::Object(self.arguments.clone())
            )
        })
    }
}

/// Outcome of executing a tool call.
///
/// The payload is always present: the serialized tool response on success,
/// a human-readable diagnostic on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    ok: bool,
    payload: String,
}

impl ExecutionResult {
    /// Creates a successful result.
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            ok: true,
            payload: payload.into(),
        }
    }

    /// Creates a failed result carrying a diagnostic.
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: diagnostic.into(),
        }
    }

    /// Returns whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Returns the payload text.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Consumes self and returns the payload.
    pub fn into_payload(self) -> String {
        self.payload
    }
}
