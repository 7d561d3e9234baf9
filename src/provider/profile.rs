//! Provider profiles: declarative configuration for model providers.

use crate::error::ApiError;
use crate::provider::CompletionOptions;
use serde::{Deserialize, Serialize};

/// Model provider configuration owned by the provider domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    /// Provider type.
    pub provider_type: ProviderType,

    /// Model identifier.
    pub model: String,

    /// API key, optional and can be loaded from environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL or endpoint, provider specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Default completion options for this provider.
    #[serde(default)]
    pub default_options: CompletionOptions,
}

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Hosted generative-language API.
    Gemini,
    /// Local Ollama daemon.
    Ollama,
    /// Self-hosted endpoint speaking the Ollama generate protocol.
    #[serde(rename = "local")]
    LocalCustom,
}

impl ProviderConfig {
    /// Load a profile from a standalone TOML file, naming it after the
    /// file stem when the file does not name itself.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!("Failed to read provider file {}: {}", path.display(), e))
        })?;
        let mut profile: ProviderConfig = toml::from_str(&content).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to parse provider file {}: {}",
                path.display(),
                e
            ))
        })?;
        if profile.provider_name.is_none() {
            profile.provider_name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string);
        }
        Ok(profile)
    }

    /// Resolve the API key: explicit config wins, then the provider's
    /// conventional environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| match self.provider_type {
            ProviderType::Gemini => std::env::var("GEMINI_API_KEY").ok(),
            ProviderType::Ollama | ProviderType::LocalCustom => None,
        })
    }

    fn endpoint_is_valid(endpoint: &str) -> bool {
        let endpoint = endpoint.trim();
        let Some(rest) = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
        else {
            return false;
        };
        let authority = rest.split('/').next().unwrap_or_default();
        let host = authority.split(':').next().unwrap_or_default();
        !host.is_empty()
            && !host.chars().any(char::is_whitespace)
            && (host == "localhost" || host.contains('.') || host.parse::<std::net::IpAddr>().is_ok())
    }

    /// Validate provider configuration.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.model.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Model name cannot be empty".to_string(),
            ));
        }

        if let Some(endpoint) = &self.endpoint {
            if !Self::endpoint_is_valid(endpoint) {
                return Err(ApiError::ConfigError(format!(
                    "Invalid endpoint URL: {}",
                    endpoint
                )));
            }
        }

        if self.provider_type == ProviderType::LocalCustom && self.endpoint.is_none() {
            return Err(ApiError::ProviderNotConfigured(
                "local provider requires an endpoint".to_string(),
            ));
        }

        if let Some(temp) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ApiError::ConfigError(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temp
                )));
            }
        }

        Ok(())
    }
}
