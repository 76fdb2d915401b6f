//! Inbound reconciler.
//!
//! Applies an update pushed by ServiceNow to the GitHub side. The incident
//! description carries a GitHub-origin header when the incident came from
//! (or was already mirrored to) an issue; that header names the issue to
//! update. Without it a new issue is created and the incident description
//! is re-stamped so later updates for the same sys_id find that issue.
//! A header that names a different sys_id belongs to another incident and
//! the update is rejected.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::incident::strip_origin_footer;
use crate::domain::models::{IncidentDraft, IncidentUpdate, LinkageMetadata};
use crate::domain::ports::{
    CreatedIssue, IncidentStore, InstallationResolver, IssueTracker, IssueUpdate,
};

use super::metadata_codec::{embed_metadata, split_body, BodyLinkage};

/// Applies ServiceNow-originated incident updates to GitHub.
pub struct InboundReconciler {
    incidents: Arc<dyn IncidentStore>,
    installations: Arc<dyn InstallationResolver>,
}

impl InboundReconciler {
    pub fn new(
        incidents: Arc<dyn IncidentStore>,
        installations: Arc<dyn InstallationResolver>,
    ) -> Self {
        Self {
            incidents,
            installations,
        }
    }

    /// Find-or-create the issue for `update` and return its number.
    pub async fn apply_incident_update(
        &self,
        owner: &str,
        repo: &str,
        update: &IncidentUpdate,
    ) -> DomainResult<u64> {
        if update.sys_id.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "sys_id must not be empty".to_string(),
            ));
        }

        let tracker = self.installations.resolve(owner, repo).await?;

        let header = split_body(&update.description);
        if let BodyLinkage::Malformed { reason, .. } = &header {
            tracing::warn!(
                sys_id = %update.sys_id,
                reason = %reason,
                "incident description carries unreadable sync metadata, treating it as unlinked"
            );
        }
        if let Some(linked) = header.metadata().and_then(LinkageMetadata::linked_sys_id) {
            if linked != update.sys_id {
                return Err(DomainError::SysIdMismatch {
                    linked: linked.to_string(),
                    received: update.sys_id.clone(),
                });
            }
        }
        let content = strip_origin_footer(header.content());

        let issue_number = match header.metadata().and_then(|m| m.issue_number) {
            Some(issue_number) => {
                tracing::info!(
                    owner = owner,
                    repo = repo,
                    issue = issue_number,
                    sys_id = %update.sys_id,
                    "updating linked issue from incident"
                );
                let body = embed_metadata(&self.issue_metadata(update, Some(issue_number)), content)?;
                tracker
                    .update_issue(
                        issue_number,
                        &IssueUpdate::title_and_body(update.short_description.clone(), body),
                    )
                    .await?;
                issue_number
            }
            None => {
                tracing::info!(
                    owner = owner,
                    repo = repo,
                    incident = %update.incident_number,
                    sys_id = %update.sys_id,
                    "creating issue for unlinked incident"
                );
                let body = embed_metadata(&self.issue_metadata(update, None), content)?;
                let created = tracker
                    .create_issue(&update.short_description, &body)
                    .await?;
                self.link_incident(update, &created, header.content()).await;
                created.number
            }
        };

        if let Some(notes) = update.work_notes() {
            Self::post_work_notes(tracker.as_ref(), issue_number, &update.sys_id, notes).await?;
        }

        Ok(issue_number)
    }

    fn issue_metadata(&self, update: &IncidentUpdate, issue_number: Option<u64>) -> LinkageMetadata {
        LinkageMetadata::for_issue(
            update.incident_number.clone(),
            update.sys_id.clone(),
            issue_number,
            self.incidents.record_url(&update.sys_id),
        )
    }

    /// Stamp the incident description with the new issue's origin header,
    /// bound to this incident's sys_id.
    ///
    /// The issue already exists at this point, so a failure is only logged.
    async fn link_incident(&self, update: &IncidentUpdate, created: &CreatedIssue, content: &str) {
        let origin = LinkageMetadata::github_origin(created.number, created.html_url.clone())
            .with_sys_id(update.sys_id.clone());
        let description = match embed_metadata(&origin, content) {
            Ok(description) => description,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode origin header");
                return;
            }
        };
        let draft = IncidentDraft {
            short_description: update.short_description.clone(),
            description,
        };
        if let Err(e) = self.incidents.update_incident(&update.sys_id, &draft).await {
            tracing::warn!(
                sys_id = %update.sys_id,
                issue = created.number,
                error = %e,
                "could not record the new issue on the incident; later updates will create another issue"
            );
        }
    }

    async fn post_work_notes(
        tracker: &dyn IssueTracker,
        issue_number: u64,
        sys_id: &str,
        notes: &str,
    ) -> DomainResult<()> {
        tracing::info!(issue = issue_number, sys_id = sys_id, "posting work notes as comment");
        let body = embed_metadata(&LinkageMetadata::for_comment(sys_id), notes)?;
        tracker.create_comment(issue_number, &body).await
    }
}
