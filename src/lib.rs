//! Snow Bridge - GitHub Issues ⇄ ServiceNow incidents
//!
//! Mirrors GitHub issues into ServiceNow incidents and comments into
//! incident work notes, and pushes incident edits made in ServiceNow back
//! onto the linked issues. The link between an issue and its incident is
//! carried inside the text bodies as an HTML-comment metadata block, so the
//! bridge keeps no state of its own.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, error taxonomy, port traits
//! - **Service Layer** (`services`): metadata codec and the sync engines
//! - **Adapters** (`adapters`): ServiceNow and GitHub REST clients, the axum router
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use snow_bridge::adapters::http::{AppState, BridgeHttpServer};
//!
//! let config = snow_bridge::ConfigLoader::load()?;
//! let state = AppState::from_ports(incidents, installations, policy, token);
//! BridgeHttpServer::new(config.server, state)
//!     .serve_with_shutdown(async { tokio::signal::ctrl_c().await.ok(); })
//!     .await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, IncidentUpdate, IssueCommentEvent, IssuesEvent, LinkageMetadata, SkipReason,
    SyncOutcome,
};
pub use domain::ports::{IncidentStore, InstallationResolver, IssueTracker};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    CommentSyncEngine, InboundReconciler, IncidentSyncEngine, SenderPolicy, WebhookDispatcher,
};
