//! Assistant service: one entry point per chat turn.
//!
//! Owns the provider client and the transcript. A turn classifies the
//! request, hands the provider the project context, parses a file proposal
//! out of the reply when one is present, and applies it to the snapshot.

use super::apply::{apply_proposal, AppliedProposal, FileProposal};
use super::intent::{self, Intent};
use super::prompt;
use super::{ChatMessage, Transcript};
use crate::error::ApiError;
use crate::provider::{CompletionOptions, CompletionRequest, ModelProviderClient};
use crate::tree::WorkspaceTree;

/// Transcript turns included as context on each request.
const CONTEXT_TURNS: usize = 12;

pub struct AssistantService {
    client: Box<dyn ModelProviderClient>,
    options: CompletionOptions,
    transcript: Transcript,
}

/// Outcome of one chat turn.
pub struct AssistantTurn {
    /// The provider's reply, verbatim, for the chat surface.
    pub reply: String,
    /// The new workspace snapshot; unchanged when no proposal applied.
    pub tree: WorkspaceTree,
    /// The applied proposal, when the reply carried one.
    pub applied: Option<AppliedProposal>,
}

impl AssistantService {
    pub fn new(client: Box<dyn ModelProviderClient>) -> Self {
        Self {
            client,
            options: CompletionOptions::default(),
            transcript: Transcript::new(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one chat turn against the given snapshot.
    pub async fn handle(
        &mut self,
        tree: &WorkspaceTree,
        request: &str,
    ) -> Result<AssistantTurn, ApiError> {
        let intent = intent::classify(request);
        tracing::info!(?intent, "assistant turn");

        let mut prompt_text = prompt::project_context(tree);
        if !self.transcript.is_empty() {
            prompt_text.push_str("\nConversation so far:\n");
            prompt_text.push_str(&self.transcript.render_recent(CONTEXT_TURNS));
            prompt_text.push('\n');
        }
        prompt_text.push_str("\nRequest: ");
        prompt_text.push_str(request);

        let completion = CompletionRequest::new(prompt_text)
            .with_system(prompt::system_prompt())
            .with_options(self.options.clone());
        let reply = self.client.complete(&completion).await?;

        self.transcript.push(ChatMessage::user(request));
        self.transcript.push(ChatMessage::assistant(&reply));

        let applied = parse_proposal(&reply, &intent)
            .and_then(|proposal| apply_proposal(tree, &proposal));
        let tree = applied
            .as_ref()
            .map(|a| a.tree.clone())
            .unwrap_or_else(|| tree.clone());

        Ok(AssistantTurn {
            reply,
            tree,
            applied,
        })
    }
}

/// Parse a file proposal out of a reply: a `path:` line plus one fenced
/// code block. When the reply has a block but no path line, the path named
/// in the request (via intent) is used instead.
fn parse_proposal(reply: &str, intent: &Intent) -> Option<FileProposal> {
    let content = parse_fenced_block(reply)?;
    let path = parse_path_line(reply).or_else(|| match intent {
        Intent::Create { path } | Intent::Update { path } => path.clone(),
        Intent::Explain | Intent::Chat => None,
    })?;
    Some(FileProposal { path, content })
}

fn parse_path_line(reply: &str) -> Option<String> {
    reply.lines().find_map(|line| {
        let line = line.trim().trim_start_matches('`').trim_end_matches('`');
        let rest = line
            .strip_prefix("path:")
            .or_else(|| line.strip_prefix("Path:"))?;
        let path = rest.trim().trim_matches('`');
        (!path.is_empty()).then(|| path.to_string())
    })
}

fn parse_fenced_block(reply: &str) -> Option<String> {
    let open = reply.find("```")?;
    // Skip the fence and an optional language tag up to end of line.
    let after_fence = &reply[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].to_string())
}
