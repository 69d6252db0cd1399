//! Configuration management for the seqgate gateway.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults. This follows the 12-factor app pattern.
//!
//! # Example
//!
//! ```ignore
//! use seqgate_server::config::GatewayConfig;
//!
//! // Load from file with env overrides
//! let config = GatewayConfig::load("config.yaml")?;
//!
//! // Or load from environment only
//! let config = GatewayConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use seqgate_domain::CoreOptions;

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct GatewayConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Authorization settings
    #[serde(default)]
    pub auth: AuthSettings,

    /// File-resolution settings
    #[serde(default)]
    pub resolution: ResolutionSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_request_timeout() -> u64 {
    30
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type: "memory" or "mongodb"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Database connection URL (required if backend is "mongodb")
    pub database_url: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_url: None,
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

/// Authorization settings.
///
/// `email_domain` switches username normalization into email mode: only
/// identities of the form `localpart@<email_domain>` are accepted and
/// the local part becomes the username. Without it, identities pass
/// through trimmed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AuthSettings {
    /// Email domain for username normalization, e.g. "example.org"
    pub email_domain: Option<String>,
}

/// File-resolution settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ResolutionSettings {
    /// Allow file sets aligned against different reference genomes.
    ///
    /// Leave off unless downstream merging can handle mixed references.
    #[serde(default)]
    pub multiref: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl GatewayConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `SEQGATE_` and use `__` as
    /// separator. For example:
    /// - `SEQGATE_SERVER__PORT=9090` overrides `server.port`
    /// - `SEQGATE_STORAGE__DATABASE_URL=...` overrides `storage.database_url`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&GatewayConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            // SEQGATE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SEQGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let gateway_config: GatewayConfig = config.try_deserialize()?;
        gateway_config.validate()?;

        Ok(gateway_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via SEQGATE_ prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&GatewayConfig::default())?)
            .add_source(
                Environment::with_prefix("SEQGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let gateway_config: GatewayConfig = config.try_deserialize()?;
        gateway_config.validate()?;

        Ok(gateway_config)
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        let valid_backends = ["memory", "mongodb"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self.storage.backend == "mongodb"
            && self
                .storage
                .database_url
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "storage.database_url is required when backend is 'mongodb'".to_string(),
            });
        }

        // A bare domain, not an address or a pattern.
        if let Some(domain) = self.auth.email_domain.as_deref() {
            if domain.trim().is_empty()
                || domain.contains('@')
                || domain.chars().any(char::is_whitespace)
            {
                return Err(ConfigLoadError::Invalid {
                    message: format!(
                        "auth.email_domain must be a bare domain name, got: {domain:?}"
                    ),
                });
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Validated options handed to the per-request evaluators.
    pub fn core_options(&self) -> CoreOptions {
        let mut options = CoreOptions::new().with_multiref(self.resolution.multiref);
        if let Some(domain) = self.auth.email_domain.as_deref() {
            options = options.with_email_domain(domain);
        }
        options
    }
}
