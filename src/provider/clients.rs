//! HTTP provider clients.
//!
//! `GeminiClient` speaks the hosted generative-language `generateContent`
//! protocol; `OllamaClient` speaks the local daemon's `generate` protocol.
//! `create_client` resolves a validated profile into a boxed client.

use crate::error::ApiError;
use crate::provider::profile::{ProviderConfig, ProviderType};
use crate::provider::{CompletionRequest, ModelProviderClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Resolve a provider profile into a client.
pub fn create_client(config: &ProviderConfig) -> Result<Box<dyn ModelProviderClient>, ApiError> {
    config.validate()?;
    match config.provider_type {
        ProviderType::Gemini => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                ApiError::ProviderNotConfigured(
                    "Gemini API key required (set in config or GEMINI_API_KEY env var)".to_string(),
                )
            })?;
            Ok(Box::new(GeminiClient::new(
                config.model.clone(),
                api_key,
                config.endpoint.clone(),
            )))
        }
        ProviderType::Ollama => Ok(Box::new(OllamaClient::new(
            config.model.clone(),
            config.endpoint.clone(),
        ))),
        ProviderType::LocalCustom => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                ApiError::ProviderNotConfigured("local provider requires an endpoint".to_string())
            })?;
            Ok(Box::new(OllamaClient::new(
                config.model.clone(),
                Some(endpoint),
            )))
        }
    }
}

/// Client for the hosted generative-language API.
pub struct GeminiClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(model: String, api_key: String, endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            model,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
        }
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

fn extract_gemini_text(response: GeminiResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let parts = candidate.content?.parts;
    if parts.is_empty() {
        return None;
    }
    Some(
        parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""),
    )
}

#[async_trait]
impl ModelProviderClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError> {
        let generation_config = if request.options.temperature.is_some()
            || request.options.max_output_tokens.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: request.options.temperature,
                max_output_tokens: request.options.max_output_tokens,
            })
        } else {
            None
        };
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system.as_deref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system }],
            }),
            generation_config,
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        tracing::debug!(model = %self.model, "sending completion request");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ApiError::ProviderRateLimit);
        }
        if !status.is_success() {
            let message = truncate(&response.text().await.unwrap_or_default(), 256);
            return Err(ApiError::ProviderRequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        extract_gemini_text(parsed)
            .ok_or_else(|| ApiError::GenerationFailed("provider returned no candidates".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Client for an Ollama-protocol endpoint (local daemon or self-hosted).
pub struct OllamaClient {
    http: reqwest::Client,
    model: String,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(model: String, endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            model,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[async_trait]
impl ModelProviderClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError> {
        let body = OllamaRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: request
                .options
                .temperature
                .map(|temperature| OllamaOptions {
                    temperature: Some(temperature),
                }),
        };

        let url = format!("{}/api/generate", self.endpoint);
        tracing::debug!(model = %self.model, "sending completion request");
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = truncate(&response.text().await.unwrap_or_default(), 256);
            return Err(ApiError::ProviderRequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaResponse = response.json().await?;
        if parsed.response.is_empty() {
            return Err(ApiError::GenerationFailed(
                "provider returned an empty response".to_string(),
            ));
        }
        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
