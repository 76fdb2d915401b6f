//! Implementation of the `snow-bridge check-config` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

use super::load_config;

#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Configuration file (replaces .snow-bridge/config.yaml and local.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Redacted view of a validated configuration.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub valid: bool,
    pub servicenow_url: String,
    pub servicenow_user: String,
    pub github_api: String,
    pub installations: Vec<String>,
    pub listen: String,
    pub bot_suffix: String,
    pub allow_logins: Vec<String>,
    pub deny_logins: Vec<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl From<&Config> for ConfigSummary {
    fn from(config: &Config) -> Self {
        Self {
            valid: true,
            servicenow_url: config.servicenow.base_url.clone(),
            servicenow_user: config.servicenow.username.clone(),
            github_api: config.github.api_base_url.clone(),
            installations: config
                .github
                .installations
                .iter()
                .map(|i| format!("{}/{}", i.owner, i.repo.as_deref().unwrap_or("*")))
                .collect(),
            listen: format!("{}:{}", config.server.host, config.server.port),
            bot_suffix: config.sender_policy.bot_suffix.clone(),
            allow_logins: config.sender_policy.allow_logins.clone(),
            deny_logins: config.sender_policy.deny_logins.clone(),
            log_level: config.logging.level.clone(),
            log_dir: config
                .logging
                .log_dir
                .as_ref()
                .map(|dir| dir.display().to_string()),
        }
    }
}

impl CommandOutput for ConfigSummary {
    fn to_human(&self) -> String {
        let mut lines = vec![
            "Configuration is valid".to_string(),
            format!("  ServiceNow:    {} (as {})", self.servicenow_url, self.servicenow_user),
            format!("  GitHub API:    {}", self.github_api),
            format!("  Listening on:  {}", self.listen),
            format!("  Bot suffix:    {}", self.bot_suffix),
            format!("  Log level:     {}", self.log_level),
        ];
        if let Some(dir) = &self.log_dir {
            lines.push(format!("  Log directory: {dir}"));
        }
        if self.installations.is_empty() {
            lines.push("\nNo installations configured; every repository is rejected".to_string());
        } else {
            lines.push("\nInstallations:".to_string());
            lines.extend(self.installations.iter().map(|i| format!("  - {i}")));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: CheckConfigArgs, json_mode: bool) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    output(&ConfigSummary::from(&config), json_mode);
    Ok(())
}
