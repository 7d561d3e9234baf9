//! Error taxonomy for the collaborator layers.
//!
//! The workspace tree operations themselves never fail (invalid input
//! degrades to a no-op snapshot); these types cover storage, configuration,
//! session, and provider boundaries.

use crate::types::NodeId;
use thiserror::Error;

/// Storage-level errors from workspace persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("persisted workspace payload is corrupt: {0}")]
    CorruptPayload(String),
}

/// API-level errors surfaced by configuration, session, and provider code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("provider request failed with status {status}: {message}")]
    ProviderRequestFailed { status: u16, message: String },

    #[error("provider rate limit exceeded")]
    ProviderRateLimit,

    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ProviderError(err.to_string())
    }
}
