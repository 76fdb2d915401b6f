//! Bridge HTTP server.
//!
//! Accepts GitHub webhook deliveries and ServiceNow-pushed incident
//! updates. Each request is handled to completion inside its own span; the
//! only suspension points are the remote calls made by the engines.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::{IncidentUpdate, ServerConfig, SyncOutcome};
use crate::domain::ports::{IncidentStore, InstallationResolver};
use crate::services::{
    CommentSyncEngine, InboundReconciler, IncidentSyncEngine, SenderPolicy, WebhookDispatcher,
};

use super::auth::is_authorized;

/// Header naming the GitHub webhook event.
const EVENT_HEADER: &str = "x-github-event";
/// Header carrying the GitHub delivery id.
const DELIVERY_HEADER: &str = "x-github-delivery";

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

/// Map a domain error onto an HTTP status.
fn domain_error(err: &DomainError) -> ApiError {
    let status = match err {
        DomainError::UnauthorizedInstallation { .. } => StatusCode::FORBIDDEN,
        DomainError::UnlinkedParent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::SysIdMismatch { .. } => StatusCode::CONFLICT,
        DomainError::RemoteApi { .. } => StatusCode::BAD_GATEWAY,
        DomainError::MalformedMetadata(_)
        | DomainError::ValidationFailed(_)
        | DomainError::SerializationError(_) => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.code(), err.to_string())
}

/// Response to a successful inbound incident update.
#[derive(Debug, Serialize, Deserialize)]
pub struct InboundUpdateResponse {
    #[serde(rename = "isSnowIntegratorMetaData")]
    pub is_sync_metadata: String,
    pub issue_number: u64,
}

impl InboundUpdateResponse {
    pub fn new(issue_number: u64) -> Self {
        Self {
            is_sync_metadata: "true".to_string(),
            issue_number,
        }
    }
}

/// Shared state for the bridge HTTP server.
pub struct AppState {
    dispatcher: WebhookDispatcher,
    reconciler: InboundReconciler,
    inbound_token: String,
}

impl AppState {
    pub const fn new(
        dispatcher: WebhookDispatcher,
        reconciler: InboundReconciler,
        inbound_token: String,
    ) -> Self {
        Self {
            dispatcher,
            reconciler,
            inbound_token,
        }
    }

    /// Wire every engine onto the same ports.
    pub fn from_ports(
        incidents: Arc<dyn IncidentStore>,
        installations: Arc<dyn InstallationResolver>,
        policy: SenderPolicy,
        inbound_token: String,
    ) -> Self {
        let dispatcher = WebhookDispatcher::new(
            IncidentSyncEngine::new(
                Arc::clone(&incidents),
                Arc::clone(&installations),
                policy.clone(),
            ),
            CommentSyncEngine::new(Arc::clone(&incidents), Arc::clone(&installations), policy),
        );
        let reconciler = InboundReconciler::new(incidents, installations);
        Self::new(dispatcher, reconciler, inbound_token)
    }
}

/// Build the router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/github", post(github_webhook))
        .route("/service-now/{owner}/{repo}/update", post(servicenow_update))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bridge HTTP Server.
pub struct BridgeHttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl BridgeHttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);

        // Host names such as "localhost" are resolved by the bind itself.
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!("snow-bridge HTTP server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn github_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let event = header_str(&headers, EVENT_HEADER).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            "MISSING_EVENT",
            "X-GitHub-Event header is required",
        )
    })?;
    let delivery = header_str(&headers, DELIVERY_HEADER)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    let span = tracing::info_span!("github_webhook", event = %event, delivery = %delivery);
    let result = state
        .dispatcher
        .dispatch(event, payload)
        .instrument(span.clone())
        .await;

    let _entered = span.enter();
    match result {
        Ok(outcome) => {
            tracing::info!(outcome = ?outcome, "webhook handled");
            Ok(Json(outcome))
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook handling failed");
            Err(domain_error(&e))
        }
    }
}

async fn servicenow_update(
    State(state): State<Arc<AppState>>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InboundUpdateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "servicenow_update",
        request_id = %request_id,
        owner = %owner,
        repo = %repo
    );

    if !is_authorized(&headers, &state.inbound_token) {
        span.in_scope(|| tracing::warn!("rejecting inbound update with missing or invalid token"));
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "a valid bearer token is required",
        ));
    }

    let update: IncidentUpdate = serde_json::from_slice(&body).map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_BODY",
            format!("invalid incident update: {e}"),
        )
    })?;

    let result = state
        .reconciler
        .apply_incident_update(&owner, &repo, &update)
        .instrument(span.clone())
        .await;

    let _entered = span.enter();
    match result {
        Ok(issue_number) => {
            tracing::info!(
                issue = issue_number,
                sys_id = %update.sys_id,
                user = ?update.user,
                "inbound update applied"
            );
            Ok(Json(InboundUpdateResponse::new(issue_number)))
        }
        Err(e) => {
            tracing::error!(error = %e, sys_id = %update.sys_id, "inbound update failed");
            Err(domain_error(&e))
        }
    }
}
