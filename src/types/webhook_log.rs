use serde::{Deserialize, Serialize};
use specta::Type;
use uuid::Uuid;

use super::ForwardResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct WebhookLog {
    pub id: Uuid,
    pub provider: String,
    pub timestamp: String,
    pub payload: Option<serde_json::Value>,
    pub results: Vec<ForwardResult>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry fields supplied by the caller; the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebhookLog {
    pub provider: String,
    pub payload: Option<serde_json::Value>,
    pub results: Vec<ForwardResult>,
    pub success: bool,
    pub error: Option<String>,
}
