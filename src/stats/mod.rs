//! Per-provider statistics and failure alerts, derived from the log store on
//! every call. Nothing here is cached or persisted.

mod engine;

pub use engine::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_REQUESTS, alerts_for, failure_alerts,
    failure_alerts_at, provider_stats, provider_stats_at,
};
