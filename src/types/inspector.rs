use serde::{Deserialize, Serialize};
use specta::Type;

use crate::types::{ForwardTarget, ProviderStats, WebhookLog};

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ListLogsResponse {
    pub logs: Vec<WebhookLog>,
    pub count: u32,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct StatsResponse {
    pub stats: Vec<ProviderStats>,
    pub provider: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct AlertsResponse {
    pub alerts: Vec<String>,
    pub count: u32,
    pub threshold: u32,
    pub min_requests: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ProviderInfo {
    pub name: String,
    pub forward_targets: Vec<ForwardTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ListProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub count: u32,
}
