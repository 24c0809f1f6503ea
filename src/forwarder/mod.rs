//! Concurrent fan-out of one payload to a provider's targets.
//!
//! Every target gets exactly one POST. Failures of any kind are reported in
//! the matching [`ForwardResult`](crate::types::ForwardResult) and never
//! abort the sibling requests.

mod client;
mod config;

pub use client::{Forwarder, ForwarderError, PRESERVED_HEADERS};
pub use config::{DEFAULT_USER_AGENT, ForwarderConfig};
