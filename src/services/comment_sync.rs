//! Comment sync engine.
//!
//! New issue comments become work notes on the parent issue's incident.
//! Work notes are an append-only journal and nothing identifies an
//! individual note afterwards, so comment edits are logged and dropped.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Comment, CommentAction, IssueCommentEvent, LinkageMetadata, SkipReason, SyncOutcome,
};
use crate::domain::ports::{IncidentStore, InstallationResolver};

use super::metadata_codec::{embed_metadata, split_body, BodyLinkage};
use super::sender_policy::SenderPolicy;

/// Drives comment → work note synchronisation.
pub struct CommentSyncEngine {
    incidents: Arc<dyn IncidentStore>,
    installations: Arc<dyn InstallationResolver>,
    policy: SenderPolicy,
}

impl CommentSyncEngine {
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

    /// Handle one `issue_comment` event.
    ///
    /// Fails with [`DomainError::UnlinkedParent`] when the parent issue was
    /// never synced, so the delivery shows up as failed instead of vanishing.
    pub async fn handle(&self, event: &IssueCommentEvent) -> DomainResult<SyncOutcome> {
        let sender = event.sender.login.as_str();
        if !self.policy.evaluate(sender).should_process() {
            tracing::debug!(
                sender = sender,
                comment = event.comment.id,
                "ignoring comment event from filtered sender"
            );
            return Ok(SyncOutcome::skipped(SkipReason::AutomatedSender {
                login: sender.to_string(),
            }));
        }

        let issue = &event.issue;
        let comment = &event.comment;

        if event.action == CommentAction::Edited {
            tracing::info!(
                issue = issue.number,
                comment = comment.id,
                previous_body = event.previous_body().unwrap_or_default(),
                "comment edited; ServiceNow work notes cannot be updated, not mirroring"
            );
            return Ok(SyncOutcome::skipped(SkipReason::CommentEditUnsupported));
        }

        if split_body(comment.body()).is_linked() {
            tracing::debug!(
                issue = issue.number,
                comment = comment.id,
                "comment already carries sync metadata"
            );
            return Ok(SyncOutcome::skipped(SkipReason::AlreadySynced));
        }

        let parent = split_body(issue.body());
        if let BodyLinkage::Malformed { reason, .. } = &parent {
            tracing::warn!(
                issue = issue.number,
                reason = %reason,
                "parent issue carries unreadable sync metadata, treating it as unlinked"
            );
        }
        let Some(sys_id) = parent.metadata().and_then(LinkageMetadata::linked_sys_id) else {
            tracing::warn!(
                issue = issue.number,
                comment = comment.id,
                "comment on an issue that was never synced"
            );
            return Err(DomainError::UnlinkedParent {
                issue_number: issue.number,
            });
        };

        let owner = event.repository.owner.login.as_str();
        let repo = event.repository.name.as_str();
        let tracker = self.installations.resolve(owner, repo).await?;

        tracing::info!(
            owner = owner,
            repo = repo,
            issue = issue.number,
            comment = comment.id,
            sys_id = sys_id,
            "adding work note"
        );
        self.incidents
            .add_work_note(sys_id, &work_note_text(comment))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    comment = comment.id,
                    sys_id = sys_id,
                    error = %e,
                    "work note failed, comment left unchanged"
                );
            })?;

        let body = embed_metadata(&LinkageMetadata::for_comment(sys_id), comment.body())?;
        tracker.update_comment(comment.id, &body).await?;

        Ok(SyncOutcome::WorkNoteAdded {
            sys_id: sys_id.to_string(),
        })
    }
}

/// Work note text for a comment: its body plus attribution.
pub fn work_note_text(comment: &Comment) -> String {
    format!(
        "{}\n\nComment by @{} on GitHub: {}",
        comment.body(),
        comment.user.login,
        comment.link()
    )
}
