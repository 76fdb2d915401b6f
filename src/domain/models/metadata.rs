//! Linkage metadata embedded in GitHub issue/comment bodies and in
//! ServiceNow incident descriptions.
//!
//! The same record travels in both directions. Which fields are set
//! depends on where it is embedded:
//!
//! | Embedded in            | `incident_number` | `sys_id` | `issue_number` | `url`            |
//! |------------------------|-------------------|----------|----------------|------------------|
//! | GitHub issue body      | yes               | yes      | yes            | incident record  |
//! | GitHub comment body    | no                | yes      | no             | no               |
//! | Incident description   | no                | once set | yes            | GitHub issue     |

use serde::{Deserialize, Serialize};

/// Cross-system identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageMetadata {
    /// Marker identifying blocks written by this bridge. Serialized as the
    /// string `"true"`; blocks written before the marker existed decode
    /// with this set to `true`.
    #[serde(
        rename = "isSnowIntegratorMetaData",
        with = "flag",
        default = "default_flag"
    )]
    pub is_sync_metadata: bool,

    /// Human-readable incident number (e.g. `INC0010016`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<String>,

    /// Immutable ServiceNow record identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_id: Option<String>,

    /// Linked GitHub issue number.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_issue_number"
    )]
    pub issue_number: Option<u64>,

    /// Link to the counterpart record on the other system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

const fn default_flag() -> bool {
    true
}

impl LinkageMetadata {
    /// Metadata written into a GitHub issue body once it is linked to an incident.
    pub fn for_issue(
        incident_number: impl Into<String>,
        sys_id: impl Into<String>,
        issue_number: Option<u64>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            is_sync_metadata: true,
            incident_number: Some(incident_number.into()),
            sys_id: Some(sys_id.into()),
            issue_number,
            url: Some(url.into()),
        }
    }

    /// Minimal marker for comments, which only carry the parent's sys_id.
    pub fn for_comment(sys_id: impl Into<String>) -> Self {
        Self {
            is_sync_metadata: true,
            incident_number: None,
            sys_id: Some(sys_id.into()),
            issue_number: None,
            url: None,
        }
    }

    /// Header written into an incident description pointing back at the
    /// GitHub issue it came from.
    pub fn github_origin(issue_number: u64, issue_url: impl Into<String>) -> Self {
        Self {
            is_sync_metadata: true,
            incident_number: None,
            sys_id: None,
            issue_number: Some(issue_number),
            url: Some(issue_url.into()),
        }
    }

    /// Attach the incident's sys_id, once ServiceNow has assigned one.
    #[must_use]
    pub fn with_sys_id(mut self, sys_id: impl Into<String>) -> Self {
        self.sys_id = Some(sys_id.into());
        self
    }

    /// True when the block was written by this bridge: the marker is set
    /// and at least one linkage field is present.
    pub fn is_bridge_block(&self) -> bool {
        self.is_sync_metadata
            && (self.linked_sys_id().is_some()
                || self.incident_number.as_deref().is_some_and(|n| !n.is_empty())
                || self.issue_number.is_some())
    }

    /// The linked sys_id, treating an empty string as absent.
    pub fn linked_sys_id(&self) -> Option<&str> {
        self.sys_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// `"true"` / `"false"` on the wire; bools are accepted when decoding.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Text(s) => Ok(s.trim().eq_ignore_ascii_case("true")),
        }
    }
}

/// ServiceNow string-typed fields may deliver the issue number as `"42"`.
fn lenient_issue_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid issue_number '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_metadata_field_order() {
        let meta = LinkageMetadata::for_issue("INC0010016", "abc123", Some(7), "https://x/y");
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"isSnowIntegratorMetaData":"true","incident_number":"INC0010016","sys_id":"abc123","issue_number":7,"url":"https://x/y"}"#
        );
    }

    #[test]
    fn test_comment_metadata_is_minimal() {
        let json = serde_json::to_string(&LinkageMetadata::for_comment("abc123")).unwrap();
        assert_eq!(json, r#"{"isSnowIntegratorMetaData":"true","sys_id":"abc123"}"#);
    }

    #[test]
    fn test_legacy_block_without_flag_decodes() {
        let json = r#"{"incident_number":"INC1", "sys_id":"s1", "url":"https://snow/nav"}"#;
        let meta: LinkageMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.is_sync_metadata);
        assert_eq!(meta.linked_sys_id(), Some("s1"));
        assert_eq!(meta.issue_number, None);
    }

    #[test]
    fn test_flag_accepts_bool_and_string() {
        let a: LinkageMetadata =
            serde_json::from_str(r#"{"isSnowIntegratorMetaData":true}"#).unwrap();
        let b: LinkageMetadata =
            serde_json::from_str(r#"{"isSnowIntegratorMetaData":"false"}"#).unwrap();
        assert!(a.is_sync_metadata);
        assert!(!b.is_sync_metadata);
    }

    #[test]
    fn test_issue_number_as_string() {
        let meta: LinkageMetadata = serde_json::from_str(r#"{"issue_number":"42"}"#).unwrap();
        assert_eq!(meta.issue_number, Some(42));

        let empty: LinkageMetadata = serde_json::from_str(r#"{"issue_number":""}"#).unwrap();
        assert_eq!(empty.issue_number, None);

        assert!(serde_json::from_str::<LinkageMetadata>(r#"{"issue_number":"x"}"#).is_err());
    }

    #[test]
    fn test_empty_sys_id_is_unlinked() {
        let meta: LinkageMetadata = serde_json::from_str(r#"{"sys_id":""}"#).unwrap();
        assert_eq!(meta.linked_sys_id(), None);
    }

    #[test]
    fn test_bridge_block_needs_marker_and_linkage() {
        assert!(LinkageMetadata::for_comment("abc123").is_bridge_block());
        assert!(LinkageMetadata::github_origin(42, "https://github.com/acme/printers/issues/42")
            .is_bridge_block());

        let foreign: LinkageMetadata = serde_json::from_str(r#"{"template":"bug-report"}"#).unwrap();
        assert!(!foreign.is_bridge_block());

        let disowned: LinkageMetadata =
            serde_json::from_str(r#"{"isSnowIntegratorMetaData":"false","sys_id":"abc123"}"#)
                .unwrap();
        assert!(!disowned.is_bridge_block());
    }

    #[test]
    fn test_origin_header_carries_sys_id_once_known() {
        let origin = LinkageMetadata::github_origin(3, "https://github.com/acme/printers/issues/3")
            .with_sys_id("2f1e3c");
        assert_eq!(origin.linked_sys_id(), Some("2f1e3c"));
        assert_eq!(origin.issue_number, Some(3));
        assert_eq!(origin.incident_number, None);
    }
}
