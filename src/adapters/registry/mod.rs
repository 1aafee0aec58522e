//! Tool Registry Adapters.
//!
//! Implementations of the ToolRegistry port.
//!
//! ## Available Adapters
//!
//! - `HttpToolRegistry` - Tool service reached over HTTP (JSON manual + JSON calls)
//! - `InMemoryToolRegistry` - Closure-backed registry for testing
//! - `LazyToolRegistry` - Single-flight lazy construction of another registry

mod http_registry;
mod in_memory;
mod lazy;

pub use http_registry::{HttpRegistryConfig, HttpToolRegistry};
pub use in_memory::{InMemoryToolRegistry, RecordedCall, ToolHandler};
pub use lazy::LazyToolRegistry;
