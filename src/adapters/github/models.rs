//! GitHub REST API request and response models.
//!
//! These structs map to the GitHub REST API v3 JSON payloads used by the
//! write side of the bridge. They are not part of the public domain model.

use serde::{Deserialize, Serialize};

/// Request body for a comment (create and update share the shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommentRequest {
    /// The comment body (Markdown).
    pub body: String,
}

/// Request body for creating a new GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateIssueRequest {
    pub title: String,
    pub body: String,
}

/// Response from the create-issue endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateIssueResponse {
    /// Issue number within the repository.
    pub number: u64,
    /// URL to view the issue in the GitHub UI.
    pub html_url: String,
}

/// Request body for patching an issue. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubIssueUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_update_omits_none_fields() {
        let req = GitHubIssueUpdateRequest {
            title: None,
            body: Some("new body".to_string()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"body":"new body"}"#);
    }

    #[test]
    fn test_create_issue_response_deserialization() {
        let json = r#"{ "id": 1, "number": 7, "html_url": "https://github.com/org/repo/issues/7", "state": "open" }"#;
        let resp: GitHubCreateIssueResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.number, 7);
        assert_eq!(resp.html_url, "https://github.com/org/repo/issues/7");
    }
}
