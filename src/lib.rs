//! Webhook relay: receives platform webhooks, validates them, fans each one
//! out to the provider's targets and keeps a bounded in-memory log with
//! per-provider statistics and failure alerts.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod forwarder;
pub mod handlers;
pub mod intake;
pub mod log_store;
pub mod providers;
pub mod router;
pub mod state;
pub mod stats;
pub mod types;
