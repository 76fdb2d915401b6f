//! ServiceNow Table API request and response models.
//!
//! These map to the JSON payloads of `/api/now/table/incident` and are not
//! part of the public domain model.

use serde::{Deserialize, Serialize};

use crate::domain::models::IncidentRecord;

/// Envelope wrapping every Table API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableResponse<T> {
    pub result: T,
}

/// Incident fields the bridge reads back. The API returns ~90 more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentResult {
    pub number: String,
    pub sys_id: String,
}

impl From<IncidentResult> for IncidentRecord {
    fn from(result: IncidentResult) -> Self {
        Self {
            number: result.number,
            sys_id: result.sys_id,
        }
    }
}

/// Request body appending to the incident's work-notes journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkNoteRequest {
    pub work_notes: String,
}
