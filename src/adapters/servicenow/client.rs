//! ServiceNow Table API client.
//!
//! Creates and updates incidents and appends work notes. Failures are not
//! retried; every transport error or non-2xx status becomes
//! [`DomainError::RemoteApi`].

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{IncidentDraft, IncidentRecord, ServiceNowConfig};
use crate::domain::ports::IncidentStore;

use super::models::{IncidentResult, TableResponse, WorkNoteRequest};

/// Path of the incident table below the instance base URL.
const INCIDENT_TABLE_PATH: &str = "/api/now/table/incident";

/// HTTP client for one ServiceNow instance.
#[derive(Clone)]
pub struct ServiceNowClient {
    http: Client,
    /// Instance base URL without trailing slash.
    base_url: String,
    username: String,
    password: String,
}

impl fmt::Debug for ServiceNowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceNowClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl ServiceNowClient {
    pub fn new(config: &ServiceNowConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    /// Build on an existing reqwest client.
    pub fn with_http(http: Client, config: &ServiceNowConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}{INCIDENT_TABLE_PATH}", self.base_url)
    }

    fn record_api_url(&self, sys_id: &str) -> String {
        format!("{}{INCIDENT_TABLE_PATH}/{sys_id}", self.base_url)
    }

    /// Build an authenticated JSON request.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
    }

    /// Send a request and map transport / status failures.
    async fn send(request: RequestBuilder, operation: &str) -> DomainResult<Response> {
        let resp = request.send().await.map_err(|e| {
            DomainError::servicenow(None, format!("{operation} request failed: {e}"))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::servicenow(
                Some(status.as_u16()),
                format!("{operation} returned {status}: {body}"),
            ));
        }

        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(resp: Response, operation: &str) -> DomainResult<T> {
        resp.json::<TableResponse<T>>()
            .await
            .map(|envelope| envelope.result)
            .map_err(|e| DomainError::servicenow(None, format!("{operation} parse failed: {e}")))
    }
}

#[async_trait]
impl IncidentStore for ServiceNowClient {
    async fn create_incident(&self, draft: &IncidentDraft) -> DomainResult<IncidentRecord> {
        let url = self.table_url();
        tracing::debug!(url = %url, "ServiceNow: creating incident");

        let resp = Self::send(
            self.request(Method::POST, &url).json(draft),
            "create_incident",
        )
        .await?;
        let result: IncidentResult = Self::parse(resp, "create_incident").await?;
        Ok(result.into())
    }

    async fn update_incident(
        &self,
        sys_id: &str,
        draft: &IncidentDraft,
    ) -> DomainResult<IncidentRecord> {
        let url = self.record_api_url(sys_id);
        tracing::debug!(url = %url, "ServiceNow: updating incident");

        let resp = Self::send(
            self.request(Method::PUT, &url).json(draft),
            "update_incident",
        )
        .await?;
        let result: IncidentResult = Self::parse(resp, "update_incident").await?;
        Ok(result.into())
    }

    async fn add_work_note(&self, sys_id: &str, note: &str) -> DomainResult<()> {
        let url = self.record_api_url(sys_id);
        tracing::debug!(url = %url, note_len = note.len(), "ServiceNow: adding work note");

        let body = WorkNoteRequest {
            work_notes: note.to_string(),
        };
        Self::send(self.request(Method::PUT, &url).json(&body), "add_work_note").await?;
        Ok(())
    }

    fn record_url(&self, sys_id: &str) -> String {
        format!("{}/nav_to.do?uri=/incident.do?sys_id={sys_id}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ServiceNowConfig {
        ServiceNowConfig {
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = ServiceNowClient::new(&config("https://dev64641.service-now.com/"));
        assert_eq!(
            client.table_url(),
            "https://dev64641.service-now.com/api/now/table/incident"
        );
        assert_eq!(
            client.record_api_url("abc"),
            "https://dev64641.service-now.com/api/now/table/incident/abc"
        );
        assert_eq!(
            client.record_url("abc"),
            "https://dev64641.service-now.com/nav_to.do?uri=/incident.do?sys_id=abc"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let client = ServiceNowClient::new(&config("https://snow"));
        let rendered = format!("{client:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
