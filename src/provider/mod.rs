//! Model Provider
//!
//! Profiles and clients for the generative-language services the assistant
//! calls. Profiles are declarative configuration; clients are the HTTP
//! implementations behind the [`ModelProviderClient`] port.

pub mod clients;
pub mod profile;

pub use clients::create_client;
pub use profile::{ProviderConfig, ProviderType};

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Completion tuning options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// One completion call: system instruction plus user-facing prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            options: CompletionOptions::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Port implemented by every provider client.
///
/// No retry policy lives here; a failed request surfaces as an error and
/// the caller decides what to tell the user.
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Run one completion and return the reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError>;

    /// Model identifier this client talks to.
    fn model(&self) -> &str;
}

/// Resolve the configured default provider profile into a client.
pub fn resolve_default_client(
    config: &crate::config::SkribeConfig,
) -> Result<Box<dyn ModelProviderClient>, ApiError> {
    let name = config.default_provider.as_deref().ok_or_else(|| {
        ApiError::ProviderNotConfigured("no default provider configured".to_string())
    })?;
    let profile = config
        .providers
        .get(name)
        .ok_or_else(|| ApiError::ProviderNotConfigured(format!("provider not found: {}", name)))?;
    create_client(profile)
}
