//! Inbound HTTP surface.
//!
//! - `POST /webhooks/github`: GitHub webhook deliveries
//! - `POST /service-now/{owner}/{repo}/update`: ServiceNow-pushed incident updates
//! - `GET /health`: liveness

pub mod auth;
pub mod server;

pub use server::{build_router, AppState, BridgeHttpServer, ErrorResponse, InboundUpdateResponse};
