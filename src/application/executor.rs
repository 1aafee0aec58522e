//! Tool executor - runs one parsed call and contains every failure.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::catalog::CatalogSnapshot;
use crate::domain::tools::{ExecutionResult, ToolCall};
use crate::ports::{CallOptions, RegistryError, ToolRegistry};

/// Executes tool calls against a [`ToolRegistry`].
///
/// Never fails: unknown tools, transport errors and tool-side errors all
/// become an [`ExecutionResult`] with `ok == false` and a diagnostic payload.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<dyn ToolRegistry>,
    timeout: Option<Duration>,
}

impl ToolExecutor {
    /// Creates an executor over a registry.
    pub fn new(registry: Arc<dyn ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Sets the timeout applied to tool calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves the call in the snapshot and invokes it.
    pub async fn execute(&self, call: &ToolCall, snapshot: &CatalogSnapshot) -> ExecutionResult {
        match self.invoke(call, snapshot).await {
            Ok(value) => {
                let payload = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                tracing::info!(
                    tool = call.tool_name(),
                    payload_len = payload.len(),
                    "Tool call succeeded"
                );
                ExecutionResult::success(payload)
            }
            Err(err) => {
                tracing::warn!(tool = call.tool_name(), error = %err, "Tool call failed");
                ExecutionResult::failure(format!(
                    "Tool call error for {} with args {}:\n{}",
                    call.tool_name(),
                    Value::Object(call.arguments().clone()),
                    err
                ))
            }
        }
    }

    async fn invoke(&self, call: &ToolCall, snapshot: &CatalogSnapshot) -> Result<Value, RegistryError> {
        let tool = snapshot
            .get(call.tool_name())
            .ok_or_else(|| RegistryError::ToolNotFound(call.tool_name().to_string()))?;

        let options = CallOptions {
            timeout: self.timeout,
        };
        self.registry
            .call_tool(tool.name(), call.arguments(), &options)
            .await
    }
}
