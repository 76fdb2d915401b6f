//! Issue tracker ports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Fields to change on an existing issue; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl IssueUpdate {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }

    pub fn title_and_body(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }
}

/// Issue returned after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

/// Write access to the issues of a single repository.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn update_issue(&self, issue_number: u64, update: &IssueUpdate) -> DomainResult<()>;

    async fn create_issue(&self, title: &str, body: &str) -> DomainResult<CreatedIssue>;

    async fn create_comment(&self, issue_number: u64, body: &str) -> DomainResult<()>;

    async fn update_comment(&self, comment_id: u64, body: &str) -> DomainResult<()>;
}

/// Resolves an owner/repo pair to a write-capable [`IssueTracker`].
///
/// Returns [`DomainError::UnauthorizedInstallation`](crate::domain::errors::DomainError::UnauthorizedInstallation)
/// when no installation grants access to the repository.
#[async_trait]
pub trait InstallationResolver: Send + Sync {
    async fn resolve(&self, owner: &str, repo: &str) -> DomainResult<Arc<dyn IssueTracker>>;
}
