//! Domain layer for snow-bridge
//!
//! Models, error taxonomy, and the ports the sync engines talk through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, RemoteService};
