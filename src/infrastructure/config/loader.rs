use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Environment variables read by earlier deployments, and the config keys
/// they map onto.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("SNOW_URL", "servicenow.base_url"),
    ("SNOW_USER", "servicenow.username"),
    ("SNOW_PASSWORD", "servicenow.password"),
];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("servicenow.base_url is required")]
    MissingServiceNowUrl,

    #[error("Invalid servicenow.base_url: {0}. Must start with http:// or https://")]
    InvalidServiceNowUrl(String),

    #[error("servicenow.username and servicenow.password are required")]
    MissingServiceNowCredentials,

    #[error("server.inbound_token is required")]
    MissingInboundToken,

    #[error("Invalid server.port: 0")]
    InvalidPort,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .snow-bridge/config.yaml
    /// 3. .snow-bridge/local.yaml (optional overrides)
    /// 4. SNOW_URL / SNOW_USER / SNOW_PASSWORD
    /// 5. SNOW_BRIDGE_* environment variables (`__` separates nested keys)
    pub fn load() -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".snow-bridge/config.yaml"))
            .merge(Yaml::file(".snow-bridge/local.yaml"));

        let config: Config = Self::with_env(figment)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring the
    /// environment overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path));

        let config: Config = Self::with_env(figment)
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn with_env(figment: Figment) -> Figment {
        let legacy_keys = LEGACY_ENV.map(|(var, _)| var);
        figment
            .merge(Env::raw().only(&legacy_keys).map(|key| {
                let mapped: &str = LEGACY_ENV
                    .iter()
                    .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
                    .map_or(key.as_str(), |(_, path)| *path);
                mapped.into()
            }))
            .merge(Env::prefixed("SNOW_BRIDGE_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let snow = &config.servicenow;
        if snow.base_url.trim().is_empty() {
            return Err(ConfigError::MissingServiceNowUrl);
        }
        if !(snow.base_url.starts_with("https://") || snow.base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidServiceNowUrl(snow.base_url.clone()));
        }
        if snow.username.is_empty() || snow.password.is_empty() {
            return Err(ConfigError::MissingServiceNowCredentials);
        }

        if config.server.inbound_token.is_empty() {
            return Err(ConfigError::MissingInboundToken);
        }
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        for (index, installation) in config.github.installations.iter().enumerate() {
            if installation.owner.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "github.installations[{index}].owner cannot be empty"
                )));
            }
            if installation.token.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "github.installations[{index}] ({}) token cannot be empty",
                    installation.owner
                )));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
