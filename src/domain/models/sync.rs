//! Outcomes reported by the sync engines.

use serde::Serialize;

/// Why an event produced no remote calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Sender was classified as an automated actor.
    AutomatedSender { login: String },
    /// Work notes are append-only; edits cannot be mirrored.
    CommentEditUnsupported,
    /// Comment already carries linkage metadata.
    AlreadySynced,
    /// Event or action the bridge does not handle.
    Unhandled { event: String },
}

/// Result of handling one inbound webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    IncidentCreated {
        incident_number: String,
        sys_id: String,
    },
    IncidentUpdated {
        incident_number: String,
        sys_id: String,
    },
    WorkNoteAdded {
        sys_id: String,
    },
    Skipped(SkipReason),
}

impl SyncOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped(reason)
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}
