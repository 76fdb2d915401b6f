//! Sync services.
//!
//! Leaf first: the metadata codec and sender policy, the two GitHub →
//! ServiceNow engines, the ServiceNow → GitHub reconciler, and the webhook
//! dispatcher that fronts the engines.

pub mod comment_sync;
pub mod inbound_reconciler;
pub mod incident_sync;
pub mod metadata_codec;
pub mod sender_policy;
pub mod webhook_dispatcher;

pub use comment_sync::CommentSyncEngine;
pub use inbound_reconciler::InboundReconciler;
pub use incident_sync::IncidentSyncEngine;
pub use metadata_codec::{embed_metadata, extract_metadata, has_metadata, split_body, BodyLinkage};
pub use sender_policy::{SenderPolicy, SenderVerdict};
pub use webhook_dispatcher::WebhookDispatcher;
