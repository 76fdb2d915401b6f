//! Incident store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{IncidentDraft, IncidentRecord};

/// Port for the remote system that owns incidents (ServiceNow).
///
/// Implementations map transport and non-2xx failures to
/// [`DomainError::RemoteApi`](crate::domain::errors::DomainError::RemoteApi).
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Create an incident and return its identity.
    async fn create_incident(&self, draft: &IncidentDraft) -> DomainResult<IncidentRecord>;

    /// Overwrite the short description and description of an existing incident.
    async fn update_incident(
        &self,
        sys_id: &str,
        draft: &IncidentDraft,
    ) -> DomainResult<IncidentRecord>;

    /// Append a work note to the incident's journal.
    async fn add_work_note(&self, sys_id: &str, note: &str) -> DomainResult<()>;

    /// Browser URL of an incident record.
    fn record_url(&self, sys_id: &str) -> String;
}
