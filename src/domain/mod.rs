//! Domain layer containing the pure types and logic of a tool-relay request.
//!
//! # Module Organization
//!
//! - `conversation` - Turns, history, and tool call extraction from replies
//! - `tools` - Tool descriptors, calls, execution results, relevance ranking

pub mod conversation;
pub mod tools;
