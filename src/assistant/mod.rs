//! Assistant Orchestration
//!
//! Turns free-text user requests into workspace mutations: classifies the
//! request, builds the project context handed to the model provider, and
//! applies the proposal the provider sends back through the pure tree
//! operations. All network I/O stays behind the provider port.

pub mod apply;
pub mod intent;
pub mod prompt;
pub mod service;

pub use apply::{apply_proposal, AppliedProposal, FileProposal};
pub use intent::Intent;
pub use service::{AssistantService, AssistantTurn};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One chat transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Chat history for one session, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the most recent turns as prompt context.
    pub fn render_recent(&self, max_turns: usize) -> String {
        let start = self.messages.len().saturating_sub(max_turns);
        self.messages[start..]
            .iter()
            .map(|m| match m.role {
                ChatRole::User => format!("User: {}", m.text),
                ChatRole::Assistant => format!("Assistant: {}", m.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_recent_keeps_only_the_tail() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::assistant("two"));
        transcript.push(ChatMessage::user("three"));

        let rendered = transcript.render_recent(2);
        assert_eq!(rendered, "Assistant: two\nUser: three");
    }
}
