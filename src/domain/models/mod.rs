//! Domain models for the bridge.

pub mod config;
pub mod github_event;
pub mod incident;
pub mod metadata;
pub mod sync;

pub use config::{
    Config, GitHubConfig, InstallationConfig, LogFormat, LoggingConfig, RotationPolicy,
    SenderPolicyConfig, ServerConfig, ServiceNowConfig,
};
pub use github_event::{
    ChangedField, Changes, Comment, CommentAction, GitHubUser, Issue, IssueAction,
    IssueCommentEvent, IssuesEvent, Repository,
};
pub use incident::{IncidentDraft, IncidentRecord, IncidentUpdate};
pub use metadata::LinkageMetadata;
pub use sync::{SkipReason, SyncOutcome};
