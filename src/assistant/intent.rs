//! Intent classification for free-text requests.
//!
//! Keyword heuristics, deliberately shallow: the model provider does the
//! heavy lifting, classification only decides which fallback path applies
//! when the provider's reply names none.

use serde::{Deserialize, Serialize};

/// What the user appears to be asking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Create a new script, optionally at a named path.
    Create { path: Option<String> },
    /// Change an existing script, optionally at a named path.
    Update { path: Option<String> },
    /// Explain code or behavior; no mutation expected.
    Explain,
    /// Anything else: plain conversation.
    Chat,
}

const CREATE_KEYWORDS: &[&str] = &["create", "new file", "new script", "add a", "make a", "make me"];
const UPDATE_KEYWORDS: &[&str] = &["update", "change", "edit", "modify", "fix", "rewrite", "rename"];
const EXPLAIN_KEYWORDS: &[&str] = &["explain", "what does", "how does", "why does", "describe"];

/// Classify a request.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    let path = extract_path(text);

    if CREATE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Create { path };
    }
    if UPDATE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Update { path };
    }
    if EXPLAIN_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Explain;
    }
    Intent::Chat
}

/// First token that looks like a workspace path: contains a `/` or a file
/// extension dot, restricted to path-safe characters.
pub fn extract_path(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '.'))
        .filter(|token| {
            !token.is_empty()
                && (token.contains('/') || token.rsplit_once('.').is_some_and(|(stem, ext)| {
                    !stem.is_empty() && !ext.is_empty() && ext.chars().all(char::is_alphanumeric)
                }))
                && token
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'))
        })
        .map(str::to_string)
        .next()
}
