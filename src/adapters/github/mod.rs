//! GitHub Issues adapter.
//!
//! Write side of the bridge: issue updates and creation, comment creation
//! and updates, each scoped to a repository the configured installations
//! grant access to.

pub mod client;
pub mod installations;
pub mod models;

pub use client::{GitHubClient, RepoIssueTracker};
pub use installations::ConfiguredInstallations;
