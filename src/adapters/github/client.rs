//! GitHub HTTP client.
//!
//! Wraps the handful of GitHub REST API v3 calls the bridge writes with.
//! One client holds one installation token; [`RepoIssueTracker`] binds it
//! to a repository and implements the [`IssueTracker`] port.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{CreatedIssue, IssueTracker, IssueUpdate};

use super::models::{
    GitHubCommentRequest, GitHubCreateIssueRequest, GitHubCreateIssueResponse,
    GitHubIssueUpdateRequest,
};

/// HTTP client for the GitHub REST API v3.
///
/// All methods return [`DomainResult`] and map HTTP / network errors
/// to [`DomainError::RemoteApi`].
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    /// API base URL without trailing slash.
    api_base: String,
    /// Installation access token.
    token: String,
    user_agent: String,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(
        http: Client,
        api_base: &str,
        token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Build an authorized request.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", self.user_agent.as_str())
    }

    /// Send a JSON body and map transport / status failures.
    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        operation: &str,
    ) -> DomainResult<Response> {
        let resp = self
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::github(None, format!("{operation} request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DomainError::github(
                Some(status.as_u16()),
                format!("{operation} returned {status}: {body_text}"),
            ));
        }

        Ok(resp)
    }

    /// Patch an issue's title and/or body.
    pub async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        update: &IssueUpdate,
    ) -> DomainResult<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_base, owner, repo, issue_number
        );
        let body = GitHubIssueUpdateRequest {
            title: update.title.clone(),
            body: update.body.clone(),
        };
        self.send_json(Method::PATCH, &url, &body, "update_issue")
            .await?;
        Ok(())
    }

    /// Create a new issue in a repository.
    ///
    /// Returns the created issue's number and URL.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
    ) -> DomainResult<GitHubCreateIssueResponse> {
        let url = format!("{}/repos/{}/{}/issues", self.api_base, owner, repo);
        let req_body = GitHubCreateIssueRequest {
            title: title.to_string(),
            body: body.to_string(),
        };

        let resp = self
            .send_json(Method::POST, &url, &req_body, "create_issue")
            .await?;

        resp.json::<GitHubCreateIssueResponse>()
            .await
            .map_err(|e| DomainError::github(None, format!("create_issue parse failed: {e}")))
    }

    /// Post a comment on an issue.
    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        comment: &str,
    ) -> DomainResult<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, owner, repo, issue_number
        );
        let body = GitHubCommentRequest {
            body: comment.to_string(),
        };
        self.send_json(Method::POST, &url, &body, "create_comment")
            .await?;
        Ok(())
    }

    /// Replace the body of an existing comment.
    pub async fn update_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        comment: &str,
    ) -> DomainResult<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, owner, repo, comment_id
        );
        let body = GitHubCommentRequest {
            body: comment.to_string(),
        };
        self.send_json(Method::PATCH, &url, &body, "update_comment")
            .await?;
        Ok(())
    }
}

/// [`GitHubClient`] bound to one repository.
#[derive(Debug, Clone)]
pub struct RepoIssueTracker {
    client: Arc<GitHubClient>,
    owner: String,
    repo: String,
}

impl RepoIssueTracker {
    pub fn new(client: Arc<GitHubClient>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl IssueTracker for RepoIssueTracker {
    async fn update_issue(&self, issue_number: u64, update: &IssueUpdate) -> DomainResult<()> {
        tracing::info!(
            owner = %self.owner,
            repo = %self.repo,
            issue = issue_number,
            title_changed = update.title.is_some(),
            "GitHub: updating issue"
        );
        self.client
            .update_issue(&self.owner, &self.repo, issue_number, update)
            .await
    }

    async fn create_issue(&self, title: &str, body: &str) -> DomainResult<CreatedIssue> {
        tracing::info!(
            owner = %self.owner,
            repo = %self.repo,
            title = %title,
            "GitHub: creating issue"
        );
        let resp = self
            .client
            .create_issue(&self.owner, &self.repo, title, body)
            .await?;
        Ok(CreatedIssue {
            number: resp.number,
            html_url: resp.html_url,
        })
    }

    async fn create_comment(&self, issue_number: u64, body: &str) -> DomainResult<()> {
        tracing::info!(
            owner = %self.owner,
            repo = %self.repo,
            issue = issue_number,
            body_len = body.len(),
            "GitHub: posting comment"
        );
        self.client
            .create_comment(&self.owner, &self.repo, issue_number, body)
            .await
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> DomainResult<()> {
        tracing::info!(
            owner = %self.owner,
            repo = %self.repo,
            comment = comment_id,
            "GitHub: updating comment"
        );
        self.client
            .update_comment(&self.owner, &self.repo, comment_id, body)
            .await
    }
}
