//! Routes GitHub webhook deliveries to the sync engines.

use serde_json::Value;

use crate::domain::errors::DomainResult;
use crate::domain::models::{IssueCommentEvent, IssuesEvent, SkipReason, SyncOutcome};

use super::comment_sync::CommentSyncEngine;
use super::incident_sync::IncidentSyncEngine;

/// Dispatches `(event name, payload)` pairs by event and action.
///
/// | Event           | Actions            | Handler                |
/// |-----------------|--------------------|------------------------|
/// | `installation`  | any                | logged only            |
/// | `issues`        | `opened`, `edited` | [`IncidentSyncEngine`] |
/// | `issue_comment` | `created`, `edited`| [`CommentSyncEngine`]  |
pub struct WebhookDispatcher {
    incidents: IncidentSyncEngine,
    comments: CommentSyncEngine,
}

impl WebhookDispatcher {
    pub const fn new(incidents: IncidentSyncEngine, comments: CommentSyncEngine) -> Self {
        Self {
            incidents,
            comments,
        }
    }

    pub async fn dispatch(&self, event: &str, payload: Value) -> DomainResult<SyncOutcome> {
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match (event, action.as_str()) {
            ("installation", _) => {
                tracing::info!(action = %action, "installation event received");
                Ok(unhandled(event, &action))
            }
            ("issues", "opened" | "edited") => {
                let event: IssuesEvent = serde_json::from_value(payload)?;
                self.incidents.handle(&event).await
            }
            ("issue_comment", "created" | "edited") => {
                let event: IssueCommentEvent = serde_json::from_value(payload)?;
                self.comments.handle(&event).await
            }
            _ => {
                tracing::debug!(event = event, action = %action, "ignoring unhandled webhook event");
                Ok(unhandled(event, &action))
            }
        }
    }
}

fn unhandled(event: &str, action: &str) -> SyncOutcome {
    let event = if action.is_empty() {
        event.to_string()
    } else {
        format!("{event}.{action}")
    };
    SyncOutcome::skipped(SkipReason::Unhandled { event })
}
