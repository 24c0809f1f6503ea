use std::sync::Arc;

use crate::config::RouterConfig;
use crate::forwarder::{Forwarder, ForwarderError};
use crate::log_store::LogStore;
use crate::providers::ProviderRegistry;

#[derive(Clone)]
pub struct AppState {
    pub logs: Arc<LogStore>,
    pub forwarder: Forwarder,
    pub providers: Arc<ProviderRegistry>,
    pub inspector_api_token: Option<String>,
}

impl AppState {
    pub fn from_config(config: &RouterConfig) -> Result<Self, ForwarderError> {
        Ok(Self {
            logs: Arc::new(LogStore::with_capacity(config.log_capacity)),
            forwarder: Forwarder::new(config.forwarder.clone())?,
            providers: Arc::new(ProviderRegistry::from_config(config)),
            inspector_api_token: config.inspector_api_token.clone(),
        })
    }
}
