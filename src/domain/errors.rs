//! Domain errors for the snow-bridge sync engines.

use std::fmt;

use thiserror::Error;

/// Remote system a failed call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteService {
    ServiceNow,
    GitHub,
}

impl fmt::Display for RemoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceNow => f.write_str("ServiceNow"),
            Self::GitHub => f.write_str("GitHub"),
        }
    }
}

/// Render an optional HTTP status as ` (status 404)` or nothing.
fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Domain-level errors that can occur while bridging GitHub and ServiceNow.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{service} request failed{}: {message}", format_status(.status))]
    RemoteApi {
        service: RemoteService,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed sync metadata: {0}")]
    MalformedMetadata(String),

    #[error("Issue #{issue_number} has not been synced to ServiceNow")]
    UnlinkedParent { issue_number: u64 },

    #[error("No installation authorizes writes to {owner}/{repo}")]
    UnauthorizedInstallation { owner: String, repo: String },

    #[error("Issue is linked to sys_id {linked}, refusing update for sys_id {received}")]
    SysIdMismatch { linked: String, received: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Shorthand for a ServiceNow failure.
    pub fn servicenow(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            service: RemoteService::ServiceNow,
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a GitHub failure.
    pub fn github(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            service: RemoteService::GitHub,
            status,
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::MalformedMetadata(_) => "MALFORMED_METADATA",
            Self::UnlinkedParent { .. } => "UNLINKED_PARENT",
            Self::UnauthorizedInstallation { .. } => "UNAUTHORIZED_INSTALLATION",
            Self::SysIdMismatch { .. } => "SYS_ID_MISMATCH",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
