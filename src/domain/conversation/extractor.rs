//! Tool call extraction from free-text model replies.
//!
//! The model is asked for a bare JSON object but often wraps it in a fenced
//! block or surrounds it with prose. Extraction tries, in order:
//!
//! 1. the first fenced block tagged `json`
//! 2. the first balanced `{ ... }` span in the reply
//!
//! Anything that does not yield an object with a string `tool_name` and an
//! object `arguments` is "no call": the model answered directly.

use crate::domain::tools::ToolCall;

/// Where in the reply a tool call was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    /// Inside a ```` ```json ```` fenced block.
    FencedBlock,
    /// First balanced brace-delimited span.
    BareObject,
}

/// Extracts a [`ToolCall`] from raw completion text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolCallParser;

impl ToolCallParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Extracts a tool call, or `None` if the reply holds no valid call.
    ///
    /// Malformed JSON is never an error.
    pub fn extract(&self, text: &str) -> Option<ToolCall> {
        self.extract_with_source(text).map(|(call, _)| call)
    }

    /// Like [`extract`](Self::extract), also reporting which tier matched.
    pub fn extract_with_source(&self, text: &str) -> Option<(ToolCall, CallSource)> {
        if let Some(call) = fenced_json_block(text).and_then(parse_call) {
            return Some((call, CallSource::FencedBlock));
        }

        let start = text.find('{')?;
        balanced_object(text, start)
            .and_then(parse_call)
            .map(|call| (call, CallSource::BareObject))
    }
}

fn parse_call(candidate: &str) -> Option<ToolCall> {
    serde_json::from_str::<serde_json::Value>(candidate)
        .ok()
        .and_then(ToolCall::from_json)
}

/// Returns the trimmed body of the first ```` ```json ```` block.
fn fenced_json_block(text: &str) -> Option<&str> {
    const FENCE: &str = "```";
    const TAG: &str = "json";

    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(FENCE) {
        let after_fence = cursor + offset + FENCE.len();
        let tagged = text[after_fence..]
            .get(..TAG.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(TAG));

        if tagged {
            let body_start = after_fence + TAG.len();
            let body_len = text[body_start..].find(FENCE)?;
            return Some(text[body_start..body_start + body_len].trim());
        }
        cursor = after_fence;
    }
    None
}

/// Returns the span from `start` (an opening brace) to its matching closer.
///
/// Braces inside JSON strings are ignored. Returns `None` when the braces
/// never balance.
fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
