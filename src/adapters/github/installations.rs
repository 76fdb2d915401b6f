//! Installation resolution from configuration.
//!
//! Each configured installation grants a token either for one repository
//! (`owner` + `repo`) or for every repository of an owner (`owner` only).
//! Exact repository grants win over owner-wide ones. Names are compared
//! case-insensitively, as GitHub does.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GitHubConfig;
use crate::domain::ports::{InstallationResolver, IssueTracker};

use super::client::{GitHubClient, RepoIssueTracker};

#[derive(Debug)]
struct Grant {
    owner: String,
    repo: Option<String>,
    client: Arc<GitHubClient>,
}

/// [`InstallationResolver`] backed by the `github.installations` config list.
#[derive(Debug)]
pub struct ConfiguredInstallations {
    grants: Vec<Grant>,
}

impl ConfiguredInstallations {
    pub fn from_config(config: &GitHubConfig) -> Self {
        let http = Client::new();
        let grants = config
            .installations
            .iter()
            .map(|installation| Grant {
                owner: installation.owner.clone(),
                repo: installation.repo.clone(),
                client: Arc::new(GitHubClient::new(
                    http.clone(),
                    &config.api_base_url,
                    installation.token.clone(),
                    config.user_agent.clone(),
                )),
            })
            .collect();
        Self { grants }
    }

    fn find(&self, owner: &str, repo: &str) -> Option<&Grant> {
        let owned_by = |g: &&Grant| g.owner.eq_ignore_ascii_case(owner);
        self.grants
            .iter()
            .filter(owned_by)
            .find(|g| g.repo.as_deref().is_some_and(|r| r.eq_ignore_ascii_case(repo)))
            .or_else(|| self.grants.iter().filter(owned_by).find(|g| g.repo.is_none()))
    }
}

#[async_trait]
impl InstallationResolver for ConfiguredInstallations {
    async fn resolve(&self, owner: &str, repo: &str) -> DomainResult<Arc<dyn IssueTracker>> {
        let grant = self.find(owner, repo).ok_or_else(|| {
            tracing::warn!(owner = owner, repo = repo, "no installation configured for repository");
            DomainError::UnauthorizedInstallation {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }
        })?;
        Ok(Arc::new(RepoIssueTracker::new(
            Arc::clone(&grant.client),
            owner,
            repo,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::InstallationConfig;

    fn installations() -> ConfiguredInstallations {
        ConfiguredInstallations::from_config(&GitHubConfig {
            installations: vec![
                InstallationConfig {
                    owner: "acme".into(),
                    repo: None,
                    token: "org-wide".into(),
                },
                InstallationConfig {
                    owner: "Acme".into(),
                    repo: Some("Printers".into()),
                    token: "printers-only".into(),
                },
            ],
            ..GitHubConfig::default()
        })
    }

    #[test]
    fn test_exact_repo_wins() {
        let resolver = installations();
        let grant = resolver.find("ACME", "printers").unwrap();
        assert_eq!(grant.repo.as_deref(), Some("Printers"));
    }

    #[test]
    fn test_owner_wide_fallback() {
        let resolver = installations();
        let grant = resolver.find("acme", "scanners").unwrap();
        assert!(grant.repo.is_none());
    }

    #[tokio::test]
    async fn test_unknown_owner_is_unauthorized() {
        let resolver = installations();
        match resolver.resolve("globex", "printers").await {
            Err(DomainError::UnauthorizedInstallation { owner, repo }) => {
                assert_eq!(owner, "globex");
                assert_eq!(repo, "printers");
            }
            Err(other) => panic!("Expected UnauthorizedInstallation, got: {other:?}"),
            Ok(_) => panic!("Expected UnauthorizedInstallation"),
        }
    }

    #[tokio::test]
    async fn test_resolve_known_repo() {
        assert!(installations().resolve("acme", "printers").await.is_ok());
    }
}
