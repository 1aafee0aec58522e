//! Remote tools - descriptors, calls, results and ranking.
//!
//! ## Key Types
//!
//! - [`Tool`] - Descriptor of a remotely invokable operation
//! - [`ToolMatch`] - A tool paired with its relevance score
//! - [`ToolCall`] - Structured call extracted from model output
//! - [`ExecutionResult`] - Outcome of running a call, always with a payload

mod ranking;
mod tool;
mod tool_call;

pub use ranking::{compare_matches, query_words, rank_tools, relevance_score};
pub use tool::{Tool, ToolMatch};
pub use tool_call::{ExecutionResult, ToolCall};
