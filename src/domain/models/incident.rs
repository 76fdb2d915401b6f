//! ServiceNow-side domain models.

use serde::{Deserialize, Serialize};

/// Identity of an incident as returned by the incident store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Human-readable number (e.g. `INC0010016`).
    pub number: String,
    /// Immutable record identifier.
    pub sys_id: String,
}

/// Fields written when creating or updating an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDraft {
    pub short_description: String,
    pub description: String,
}

/// Update pushed by ServiceNow to `POST /service-now/{owner}/{repo}/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub incident_number: String,
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    pub sys_id: String,
    /// ServiceNow user who made the change. Informational only.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub work_notes: Option<String>,
}

impl IncidentUpdate {
    /// Work notes with surrounding whitespace removed, if any remain.
    pub fn work_notes(&self) -> Option<&str> {
        self.work_notes
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Prefix of the footer appended to incident descriptions created from GitHub.
pub const ORIGIN_FOOTER_PREFIX: &str = "Generated from GitHub: ";

/// Footer appended to an incident description naming the source issue and its author.
pub fn origin_footer(issue_url: &str, login: &str) -> String {
    format!("{ORIGIN_FOOTER_PREFIX}{issue_url} (opened by @{login})")
}

/// Append the origin footer to an issue body.
pub fn with_origin_footer(body: &str, issue_url: &str, login: &str) -> String {
    format!("{body}\n{}", origin_footer(issue_url, login))
}

/// Remove a trailing origin footer previously added by [`with_origin_footer`].
///
/// Text that does not end with a footer line is returned unchanged.
pub fn strip_origin_footer(description: &str) -> &str {
    let trimmed = description.trim_end();
    let Some(idx) = trimmed.rfind('\n') else {
        return description;
    };
    if trimmed[idx + 1..].starts_with(ORIGIN_FOOTER_PREFIX) {
        let head = &trimmed[..idx];
        head.strip_suffix('\r').unwrap_or(head)
    } else {
        description
    }
}
