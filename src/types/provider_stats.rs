use serde::{Deserialize, Serialize};
use specta::Type;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct ProviderStats {
    pub provider: String,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub success_rate: u32,
    pub avg_response_time_ms: u32,
    pub last_hour: u32,
    pub last_24_hours: u32,
}
