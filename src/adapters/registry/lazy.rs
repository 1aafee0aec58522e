//! Lazily initialized registry with single-flight construction.
//!
//! The inner registry is built on first use. Concurrent first callers wait
//! on one construction; a failed construction is not cached, so the next
//! caller tries again.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::domain::tools::ToolMatch;
use crate::ports::{CallOptions, RegistryError, ToolRegistry};

type Initializer =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn ToolRegistry>, RegistryError>> + Send + Sync>;

/// A [`ToolRegistry`] that constructs its inner registry on first use.
///
/// # Example
///
/// ```ignore
/// let registry = LazyToolRegistry::new(move || {
///     let config = config.clone();
///     async move {
///         let inner = HttpToolRegistry::connect(config).await?;
///         Ok(Arc::new(inner) as Arc<dyn ToolRegistry>)
///     }
/// });
/// ```
pub struct LazyToolRegistry {
    cell: OnceCell<Arc<dyn ToolRegistry>>,
    init: Initializer,
}

impl LazyToolRegistry {
    /// Creates a lazy registry from an async initializer.
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn ToolRegistry>, RegistryError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(move || Box::pin(init())),
        }
    }

    /// Returns true once the inner registry has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the inner registry, building it if needed.
    pub async fn get(&self) -> Result<&Arc<dyn ToolRegistry>, RegistryError> {
        self.cell
            .get_or_try_init(|| async {
                tracing::debug!("Initializing tool registry");
                let result = (self.init)().await;
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "Tool registry initialization failed");
                }
                result
            })
            .await
    }
}

#[async_trait]
impl ToolRegistry for LazyToolRegistry {
    async fn search_tools(
        &self,
        query: &str,
        limit: usize,
        options: &CallOptions,
    ) -> Result<Vec<ToolMatch>, RegistryError> {
        self.get().await?.search_tools(query, limit, options).await
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        options: &CallOptions,
    ) -> Result<Value, RegistryError> {
        self.get().await?.call_tool(name, arguments, options).await
    }
}
