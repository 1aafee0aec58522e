//! Relevance ranking of tools against a free-text query.
//!
//! Scores are integer so that ordering is total and reproducible.

use std::cmp::Ordering;

use super::{Tool, ToolMatch};

const TAG_WEIGHT: u32 = 3;
const NAME_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// Splits text into lowercase words. Underscores stay inside words so that
/// tool names like `get_config` survive as one token.
pub fn query_words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Scores a tool against a query.
///
/// Per query word: a matching tag is worth 3, a substring of the tool name 2,
/// an exact description word 1.
pub fn relevance_score(query: &str, tool: &Tool) -> u32 {
    let name = tool.name().to_lowercase();
    let tags: Vec<String> = tool.tags().iter().map(|t| t.to_lowercase()).collect();
    let description = query_words(tool.description());

    query_words(query)
        .iter()
        .map(|word| {
            let mut score = 0;
            if tags.iter().any(|t| t == word) {
                score += TAG_WEIGHT;
            }
            if name.contains(word.as_str()) {
                score += NAME_WEIGHT;
            }
            if description.iter().any(|d| d == word) {
                score += DESCRIPTION_WEIGHT;
            }
            score
        })
        .sum()
}

/// Orders matches by score descending, then name ascending.
pub fn compare_matches(a: &ToolMatch, b: &ToolMatch) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.tool.name().cmp(b.tool.name()))
}

/// Scores every tool, ranks them and keeps at most `limit`.
pub fn rank_tools<'a>(
    query: &str,
    tools: impl IntoIterator<Item = &'a Tool>,
    limit: usize,
) -> Vec<ToolMatch> {
    let mut matches: Vec<ToolMatch> = tools
        .into_iter()
        .map(|tool| ToolMatch::new(tool.clone(), relevance_score(query, tool)))
        .collect();
    matches.sort_by(compare_matches);
    matches.truncate(limit);
    matches
}
