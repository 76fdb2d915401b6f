//! ServiceNow incident store adapter.
//!
//! Talks to the Table API of a ServiceNow instance with basic auth and
//! implements [`IncidentStore`](crate::domain::ports::IncidentStore).

pub mod client;
pub mod models;

pub use client::ServiceNowClient;
