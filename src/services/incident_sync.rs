//! Incident sync engine.
//!
//! Mirrors `issues.opened` / `issues.edited` into ServiceNow. An issue is
//! either unlinked (no metadata block with a sys_id) or linked to exactly
//! one incident. Unlinked issues get a new incident; linked issues update
//! the incident they point at. Either way the issue body is rewritten to
//! carry the refreshed linkage block ahead of the untouched content.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::incident::with_origin_footer;
use crate::domain::models::{
    IncidentDraft, Issue, IssuesEvent, LinkageMetadata, SkipReason, SyncOutcome,
};
use crate::domain::ports::{IncidentStore, InstallationResolver, IssueTracker, IssueUpdate};

use super::metadata_codec::{embed_metadata, split_body, BodyLinkage};
use super::sender_policy::SenderPolicy;

/// Drives issue → incident synchronisation.
pub struct IncidentSyncEngine {
    incidents: Arc<dyn IncidentStore>,
    installations: Arc<dyn InstallationResolver>,
    policy: SenderPolicy,
}

impl IncidentSyncEngine {
    pub fn new(
        incidents: Arc<dyn IncidentStore>,
        installations: Arc<dyn InstallationResolver>,
        policy: SenderPolicy,
    ) -> Self {
        Self {
            incidents,
            installations,
            policy,
        }
    }

    /// Handle one `issues` event.
    ///
    /// Remote failures are logged and returned; nothing is written back to
    /// GitHub unless the incident call succeeded.
    pub async fn handle(&self, event: &IssuesEvent) -> DomainResult<SyncOutcome> {
        let sender = event.sender.login.as_str();
        let verdict = self.policy.evaluate(sender);
        if !verdict.should_process() {
            tracing::debug!(
                sender = sender,
                verdict = ?verdict,
                issue = event.issue.number,
                "ignoring issue event from filtered sender"
            );
            return Ok(SyncOutcome::skipped(SkipReason::AutomatedSender {
                login: sender.to_string(),
            }));
        }

        let owner = event.repository.owner.login.as_str();
        let repo = event.repository.name.as_str();
        let issue = &event.issue;

        let linkage = split_body(issue.body());
        if let BodyLinkage::Malformed { reason, .. } = &linkage {
            tracing::warn!(
                owner = owner,
                repo = repo,
                issue = issue.number,
                reason = %reason,
                "issue carries unreadable sync metadata, treating it as unlinked"
            );
        }
        let content = linkage.content();

        // Resolve write access before touching ServiceNow so a missing
        // installation cannot leave an unlinked incident behind.
        let tracker = self.installations.resolve(owner, repo).await?;

        let existing = linkage
            .metadata()
            .and_then(|m| m.linked_sys_id().map(|sys_id| (m, sys_id)));

        match existing {
            Some((metadata, sys_id)) => {
                tracing::info!(
                    owner = owner,
                    repo = repo,
                    issue = issue.number,
                    action = ?event.action,
                    sys_id = sys_id,
                    previous_title = event.previous_title(),
                    body_changed = event.body_changed(),
                    "updating linked incident"
                );
                let draft = Self::draft_for(issue, content, Some(sys_id))?;
                let record = self
                    .incidents
                    .update_incident(sys_id, &draft)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(
                            issue = issue.number,
                            sys_id = sys_id,
                            error = %e,
                            "incident update failed, issue left unchanged"
                        );
                    })?;
                if record.sys_id != sys_id {
                    tracing::warn!(
                        linked = sys_id,
                        returned = %record.sys_id,
                        "ServiceNow returned a different sys_id, keeping the linked one"
                    );
                }

                let incident_number = metadata
                    .incident_number
                    .clone()
                    .unwrap_or(record.number);
                let refreshed = LinkageMetadata::for_issue(
                    incident_number.clone(),
                    sys_id,
                    Some(issue.number),
                    self.incidents.record_url(sys_id),
                );
                Self::write_back(tracker.as_ref(), issue, &refreshed, content).await?;

                Ok(SyncOutcome::IncidentUpdated {
                    incident_number,
                    sys_id: sys_id.to_string(),
                })
            }
            None => {
                tracing::info!(
                    owner = owner,
                    repo = repo,
                    issue = issue.number,
                    action = ?event.action,
                    "creating incident for unlinked issue"
                );
                let draft = Self::draft_for(issue, content, None)?;
                let record = self
                    .incidents
                    .create_incident(&draft)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(
                            issue = issue.number,
                            error = %e,
                            "incident creation failed, issue left unlinked"
                        );
                    })?;
                tracing::info!(
                    issue = issue.number,
                    incident = %record.number,
                    sys_id = %record.sys_id,
                    "incident created"
                );

                let metadata = LinkageMetadata::for_issue(
                    record.number.clone(),
                    record.sys_id.clone(),
                    Some(issue.number),
                    self.incidents.record_url(&record.sys_id),
                );
                Self::write_back(tracker.as_ref(), issue, &metadata, content)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(
                            issue = issue.number,
                            sys_id = %record.sys_id,
                            error = %e,
                            "linkage write-back failed, incident is orphaned"
                        );
                    })?;
                self.stamp_sys_id(issue, content, &record.sys_id).await;

                Ok(SyncOutcome::IncidentCreated {
                    incident_number: record.number,
                    sys_id: record.sys_id,
                })
            }
        }
    }

    /// Incident fields for an issue: title as short description, and the
    /// content behind a GitHub-origin header with an origin footer.
    ///
    /// The header names the incident's own sys_id once it is known, so a
    /// description copied into another incident is rejected inbound.
    pub fn draft_for(
        issue: &Issue,
        content: &str,
        sys_id: Option<&str>,
    ) -> DomainResult<IncidentDraft> {
        let mut origin = LinkageMetadata::github_origin(issue.number, issue.link());
        if let Some(sys_id) = sys_id {
            origin = origin.with_sys_id(sys_id);
        }
        let description = embed_metadata(
            &origin,
            &with_origin_footer(content, issue.link(), &issue.user.login),
        )?;
        Ok(IncidentDraft {
            short_description: issue.title.clone(),
            description,
        })
    }

    /// Rewrite a freshly created incident's origin header with its sys_id.
    ///
    /// Issue and incident are already linked from the GitHub side, so a
    /// failure is only logged.
    async fn stamp_sys_id(&self, issue: &Issue, content: &str, sys_id: &str) {
        let result = match Self::draft_for(issue, content, Some(sys_id)) {
            Ok(draft) => self.incidents.update_incident(sys_id, &draft).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(
                issue = issue.number,
                sys_id = sys_id,
                error = %e,
                "failed to stamp sys_id into incident origin header"
            );
        }
    }

    async fn write_back(
        tracker: &dyn IssueTracker,
        issue: &Issue,
        metadata: &LinkageMetadata,
        content: &str,
    ) -> DomainResult<()> {
        let body = embed_metadata(metadata, content)?;
        if body == issue.body() {
            tracing::debug!(issue = issue.number, "linkage unchanged, skipping write-back");
            return Ok(());
        }
        tracker
            .update_issue(issue.number, &IssueUpdate::body(body))
            .await
    }
}
