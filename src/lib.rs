//! Tool Relay - natural-language requests to remote tool calls
//!
//! This crate turns one user request into at most one structured call to a
//! remotely discovered tool, runs it, and has a completion model answer from
//! the result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
