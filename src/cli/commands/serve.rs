//! Implementation of the `snow-bridge serve` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::adapters::github::ConfiguredInstallations;
use crate::adapters::http::{AppState, BridgeHttpServer};
use crate::adapters::servicenow::ServiceNowClient;
use crate::domain::models::Config;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::SenderPolicy;

use super::load_config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file (replaces .snow-bridge/config.yaml and local.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, _json_mode: bool) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args.host, args.port);

    let _logger = LoggerImpl::init(&config.logging)?;

    let incidents = Arc::new(ServiceNowClient::new(&config.servicenow));
    let installations = Arc::new(ConfiguredInstallations::from_config(&config.github));
    let policy = SenderPolicy::from_config(&config.sender_policy);

    tracing::info!(
        servicenow = %config.servicenow.base_url,
        installations = config.github.installations.len(),
        "starting snow-bridge"
    );

    let state = AppState::from_ports(
        incidents,
        installations,
        policy,
        config.server.inbound_token.clone(),
    );
    BridgeHttpServer::new(config.server, state)
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("snow-bridge stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("shutdown signal received");
}
