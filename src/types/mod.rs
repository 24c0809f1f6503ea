pub mod api_error;
pub mod forward;
pub mod inspector;
pub mod intake;
pub mod provider_stats;
pub mod webhook_log;

#[allow(unused_imports)]
pub use api_error::{ApiErrorCode, ApiErrorResponse};
#[allow(unused_imports)]
pub use forward::{ForwardResult, ForwardTarget};
#[allow(unused_imports)]
pub use inspector::{
    AlertsResponse, ListLogsResponse, ListProvidersResponse, ProviderInfo, StatsResponse,
};
#[allow(unused_imports)]
pub use intake::{HealthResponse, IntakeResponse};
#[allow(unused_imports)]
pub use provider_stats::ProviderStats;
#[allow(unused_imports)]
pub use webhook_log::{NewWebhookLog, WebhookLog};
