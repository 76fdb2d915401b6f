//! GitHub webhook payloads consumed by the sync engines.
//!
//! Only the fields the bridge reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};

/// A GitHub account (user, bot, or organisation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Repository the event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: GitHubUser,
}

/// Issue as embedded in `issues` and `issue_comment` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    /// Issue body; GitHub sends `null` for an empty body.
    #[serde(default)]
    pub body: Option<String>,
    /// REST API URL of the issue.
    pub url: String,
    /// Browser URL of the issue.
    #[serde(default)]
    pub html_url: Option<String>,
    pub user: GitHubUser,
}

impl Issue {
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Browser URL when present, API URL otherwise.
    pub fn link(&self) -> &str {
        self.html_url.as_deref().unwrap_or(&self.url)
    }
}

/// Issue comment as embedded in `issue_comment` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub user: GitHubUser,
}

impl Comment {
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn link(&self) -> &str {
        self.html_url.as_deref().unwrap_or(&self.url)
    }
}

/// Previous value of an edited field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedField {
    pub from: String,
}

/// `changes` object on `edited` events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub body: Option<ChangedField>,
    #[serde(default)]
    pub title: Option<ChangedField>,
}

impl Changes {
    pub fn previous_body(&self) -> Option<&str> {
        self.body.as_ref().map(|c| c.from.as_str())
    }

    pub fn previous_title(&self) -> Option<&str> {
        self.title.as_ref().map(|c| c.from.as_str())
    }
}

/// Action of an `issues` event that the bridge reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueAction {
    Opened,
    Edited,
}

/// Action of an `issue_comment` event that the bridge reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAction {
    Created,
    Edited,
}

/// `issues.opened` / `issues.edited` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub action: IssueAction,
    pub issue: Issue,
    pub repository: Repository,
    pub sender: GitHubUser,
    #[serde(default)]
    pub changes: Option<Changes>,
}

impl IssuesEvent {
    /// Title before an `edited` event, if the edit changed it.
    pub fn previous_title(&self) -> Option<&str> {
        self.changes.as_ref().and_then(Changes::previous_title)
    }

    /// True when an `edited` event reports a body change.
    pub fn body_changed(&self) -> bool {
        self.changes
            .as_ref()
            .is_some_and(|c| c.previous_body().is_some())
    }
}

/// `issue_comment.created` / `issue_comment.edited` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub action: CommentAction,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
    pub sender: GitHubUser,
    #[serde(default)]
    pub changes: Option<Changes>,
}

impl IssueCommentEvent {
    /// Comment text before an `edited` event.
    pub fn previous_body(&self) -> Option<&str> {
        self.changes.as_ref().and_then(Changes::previous_body)
    }
}
