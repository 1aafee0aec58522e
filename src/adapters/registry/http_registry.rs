//! HTTP tool registry - discovers tools from a JSON manual and calls them over HTTP.
//!
//! # Wire format
//!
//! Discovery fetches `GET {base_url}{manual_path}`:
//!
//! ```json
//! {
//!   "tools": [
//!     {
//!       "name": "netconf_tools.netconf_get_config",
//!       "description": "Retrieve device configuration",
//!       "tags": ["netconf", "config"],
//!       "inputs": { "type": "object", "properties": { "host": { "type": "string" } } },
//!       "endpoint": { "url": "/netconf/get-config", "method": "POST" }
//!     }
//!   ]
//! }
//! ```
//!
//! A call sends the arguments as the JSON body to the tool's endpoint, or to
//! `POST {base_url}/tools/{name}` when the manual names none.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::domain::tools::{rank_tools, Tool, ToolMatch};
use crate::ports::{CallOptions, RegistryError, ToolRegistry};

/// Configuration for the HTTP registry.
#[derive(Debug, Clone)]
pub struct HttpRegistryConfig {
    /// Base URL of the tool service (e.g., "http://127.0.0.1:8000").
    pub base_url: String,
    /// Path of the tool manual, relative to the base URL.
    pub manual_path: String,
    /// Default timeout for calls that carry none.
    pub timeout: Duration,
}

impl HttpRegistryConfig {
    /// Creates a configuration with default manual path and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            manual_path: "/utcp".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the manual path.
    pub fn with_manual_path(mut self, path: impl Into<String>) -> Self {
        self.manual_path = path.into();
        self
    }

    /// Sets the default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Resolves a possibly relative path against the base URL.
    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base(), path)
        } else {
            format!("{}/{}", self.base(), path)
        }
    }

    fn manual_url(&self) -> String {
        self.resolve(&self.manual_path)
    }

    fn default_endpoint(&self, tool_name: &str) -> ToolEndpoint {
        ToolEndpoint {
            url: format!("{}/tools/{}", self.base(), tool_name),
            method: default_method(),
        }
    }
}

/// Where and how a tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ToolEndpoint {
    url: String,
    #[serde(default = "default_method")]
    method: String,
}

fn default_method() -> String {
    "POST".to_string()
}

#[derive(Debug, Deserialize)]
struct ToolManual {
    tools: Vec<ManualEntry>,
}

#[derive(Debug, Deserialize)]
struct ManualEntry {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, alias = "inputs")]
    argument_schema: Value,
    #[serde(default)]
    endpoint: Option<ToolEndpoint>,
}

/// Parses a manual body into tools and their resolved endpoints.
fn parse_manual(
    config: &HttpRegistryConfig,
    body: &str,
) -> Result<Vec<(Tool, ToolEndpoint)>, RegistryError> {
    let manual: ToolManual = serde_json::from_str(body)
        .map_err(|e| RegistryError::InvalidManual(e.to_string()))?;

    manual
        .tools
        .into_iter()
        .map(|entry| {
            if entry.name.trim().is_empty() {
                return Err(RegistryError::InvalidManual("tool with empty name".to_string()));
            }
            let endpoint = match entry.endpoint {
                Some(endpoint) => ToolEndpoint {
                    url: config.resolve(&endpoint.url),
                    method: endpoint.method,
                },
                None => config.default_endpoint(&entry.name),
            };
            let tool = Tool::new(entry.name, entry.description, entry.argument_schema)
                .with_tags(entry.tags);
            Ok((tool, endpoint))
        })
        .collect()
}

/// Converts a tool response body to JSON, keeping non-JSON text as a string.
fn response_value(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

/// Tool registry backed by an HTTP tool service.
pub struct HttpToolRegistry {
    config: HttpRegistryConfig,
    client: Client,
    endpoints: RwLock<HashMap<String, ToolEndpoint>>,
}

impl HttpToolRegistry {
    /// Creates a registry without contacting the service.
    pub fn new(config: HttpRegistryConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RegistryError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            endpoints: RwLock::new(HashMap::new()),
        })
    }

    /// Creates a registry and verifies the manual can be fetched.
    pub async fn connect(config: HttpRegistryConfig) -> Result<Self, RegistryError> {
        let registry = Self::new(config)?;
        let tools = registry.refresh(&CallOptions::default()).await?;
        tracing::info!(
            manual_url = %registry.config.manual_url(),
            tool_count = tools.len(),
            "Connected to tool registry"
        );
        Ok(registry)
    }

    fn map_send_error(&self, err: reqwest::Error, timeout: Duration) -> RegistryError {
        if err.is_timeout() {
            RegistryError::Timeout(timeout)
        } else if err.is_connect() {
            RegistryError::unavailable(format!("Connection failed: {}", err))
        } else {
            RegistryError::network(err.to_string())
        }
    }

    /// Fetches the manual and replaces the endpoint cache.
    async fn refresh(&self, options: &CallOptions) -> Result<Vec<Tool>, RegistryError> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let response = self
            .client
            .get(self.config.manual_url())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::network(e.to_string()))?;
        if !status.is_success() {
            return Err(RegistryError::unavailable(format!(
                "Manual request returned {}: {}",
                status, body
            )));
        }

        let entries = parse_manual(&self.config, &body)?;
        let mut endpoints = self.endpoints.write().await;
        endpoints.clear();
        let tools = entries
            .into_iter()
            .map(|(tool, endpoint)| {
                endpoints.insert(tool.name().to_string(), endpoint);
                tool
            })
            .collect();
        Ok(tools)
    }

    async fn endpoint_for(
        &self,
        name: &str,
        options: &CallOptions,
    ) -> Result<ToolEndpoint, RegistryError> {
        if let Some(endpoint) = self.endpoints.read().await.get(name) {
            return Ok(endpoint.clone());
        }

        tracing::debug!(tool = name, "Endpoint cache miss, refetching manual");
        self.refresh(options).await?;
        self.endpoints
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))
    }
}

#[async_trait]
impl ToolRegistry for HttpToolRegistry {
    async fn search_tools(
        &self,
        query: &str,
        limit: usize,
        options: &CallOptions,
    ) -> Result<Vec<ToolMatch>, RegistryError> {
        let tools = self.refresh(options).await?;
        Ok(rank_tools(query, &tools, limit))
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        options: &CallOptions,
    ) -> Result<Value, RegistryError> {
        let endpoint = self.endpoint_for(name, options).await?;
        let method = Method::from_bytes(endpoint.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                RegistryError::InvalidManual(format!(
                    "unsupported method {} for tool {}",
                    endpoint.method, name
                ))
            })?;
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let response = self
            .client
            .request(method, &endpoint.url)
            .timeout(timeout)
            .json(arguments)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(RegistryError::tool_failed(status.as_u16(), body));
        }
        Ok(response_value(body))
    }
}
