use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for snow-bridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// ServiceNow incident store connection
    #[serde(default)]
    pub servicenow: ServiceNowConfig,

    /// GitHub API access and installations
    #[serde(default)]
    pub github: GitHubConfig,

    /// Inbound HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Automated-sender filtering
    #[serde(default)]
    pub sender_policy: SenderPolicyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ServiceNow connection settings
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceNowConfig {
    /// Instance base URL, e.g. `https://dev12345.service-now.com`
    #[serde(default)]
    pub base_url: String,

    /// Basic-auth user name
    #[serde(default)]
    pub username: String,

    /// Basic-auth password
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ServiceNowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceNowConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// REST API base URL (override for GitHub Enterprise Server)
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Repositories the bridge may write to
    #[serde(default)]
    pub installations: Vec<InstallationConfig>,
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "snow-bridge".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_github_api_base_url(),
            user_agent: default_user_agent(),
            installations: vec![],
        }
    }
}

/// Write grant for one owner, or one repository of that owner
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InstallationConfig {
    /// Repository owner (user or organisation)
    pub owner: String,

    /// Repository name; `None` grants every repository of `owner`
    #[serde(default)]
    pub repo: Option<String>,

    /// Installation access token
    pub token: String,
}

impl fmt::Debug for InstallationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// HTTP server settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token ServiceNow must present on the inbound update endpoint
    #[serde(default)]
    pub inbound_token: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            inbound_token: String::new(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("inbound_token", &"[REDACTED]")
            .finish()
    }
}

/// Rules deciding which webhook senders are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SenderPolicyConfig {
    /// Login suffix marking automated accounts
    #[serde(default = "default_bot_suffix")]
    pub bot_suffix: String,

    /// Logins always processed, even when they carry the bot suffix
    #[serde(default)]
    pub allow_logins: Vec<String>,

    /// Logins never processed
    #[serde(default)]
    pub deny_logins: Vec<String>,
}

fn default_bot_suffix() -> String {
    "[bot]".to_string()
}

impl Default for SenderPolicyConfig {
    fn default() -> Self {
        Self {
            bot_suffix: default_bot_suffix(),
            allow_logins: vec![],
            deny_logins: vec![],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sender_policy.bot_suffix, "[bot]");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.rotation, RotationPolicy::Daily);
        assert!(config.github.installations.is_empty());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::default();
        config.servicenow.password = "hunter2".into();
        config.server.inbound_token = "s3cret-token".into();
        config.github.installations.push(InstallationConfig {
            owner: "acme".into(),
            repo: None,
            token: "ghs_abcdef".into(),
        });

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret-token"));
        assert!(!rendered.contains("ghs_abcdef"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
