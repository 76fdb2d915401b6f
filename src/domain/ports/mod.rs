//! Port trait definitions (Hexagonal Architecture)
//!
//! The sync engines reach both remote systems only through these traits:
//! - IncidentStore: ServiceNow incident operations
//! - IssueTracker: GitHub issue/comment writes for one repository
//! - InstallationResolver: owner/repo to authorized IssueTracker

pub mod incident_store;
pub mod issue_tracker;

pub use incident_store::IncidentStore;
pub use issue_tracker::{CreatedIssue, InstallationResolver, IssueTracker, IssueUpdate};
