use serde::{Deserialize, Serialize};
use specta::Type;
use uuid::Uuid;

use super::ForwardResult;

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct IntakeResponse {
    pub success: bool,
    pub message: String,
    pub log_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ForwardResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub providers: Vec<String>,
    pub timestamp: String,
}
