//! Configuration
//!
//! A single [`SkribeConfig`] loaded from an optional TOML file merged with
//! `SKRIBE_*` environment overrides. Credentials and the workspace access
//! secret are explicit configuration injected at startup; nothing in the
//! engine reads them from ambient storage.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::profile::ProviderConfig;
use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkribeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    /// Named provider profiles.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Provider profile the assistant uses when none is named.
    #[serde(default)]
    pub default_provider: Option<String>,
}

/// Workspace storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store location; None means the platform data directory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store path, defaulting under the platform data dir.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let project_dirs = directories::ProjectDirs::from("", "skribe", "skribe")
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "Could not determine platform data directory for workspace store".to_string(),
                )
            })?;
        Ok(project_dirs.data_dir().join("workspace-store"))
    }
}

/// Access-gate configuration for the hosted IDE.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Shared secret required to open a session; None disables the gate.
    #[serde(default)]
    pub access_secret: Option<String>,
}

/// An authorized session. Constructed only through [`Session::open`].
#[derive(Debug, Clone)]
pub struct Session {
    pub opened_at: DateTime<Utc>,
}

impl Session {
    /// Open a session, checking `offered` against the configured secret.
    /// With no secret configured the gate is disabled and any caller gets
    /// a session.
    pub fn open(config: &SessionConfig, offered: Option<&str>) -> Result<Self, ApiError> {
        match &config.access_secret {
            None => Ok(Self { opened_at: Utc::now() }),
            Some(expected) if offered == Some(expected.as_str()) => {
                Ok(Self { opened_at: Utc::now() })
            }
            Some(_) => Err(ApiError::Unauthorized(
                "access secret missing or incorrect".to_string(),
            )),
        }
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the given file (if present) merged with
    /// `SKRIBE_*` environment overrides (e.g. `SKRIBE_LOGGING__LEVEL`).
    pub fn load(config_path: Option<&Path>) -> Result<SkribeConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(Environment::with_prefix("SKRIBE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a specific file, no environment merge.
    pub fn load_from_file(path: &Path) -> Result<SkribeConfig, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> SkribeConfig {
        SkribeConfig::default()
    }
}
