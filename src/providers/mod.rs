//! The fixed set of platforms that can deliver webhooks.
//!
//! Each platform implements [`WebhookProvider`]; [`Provider`] closes over the
//! set and dispatches by `match`.

mod facebook;
mod instagram;
mod verification;

pub use facebook::FacebookProvider;
pub use instagram::InstagramProvider;
pub use verification::{VerificationQuery, verify_subscription};

use serde_json::Value;

use crate::config::RouterConfig;
use crate::types::{ForwardTarget, ProviderInfo};

pub trait WebhookProvider {
    fn name(&self) -> &'static str;

    fn forward_targets(&self) -> &[ForwardTarget];

    /// Shape check on the parsed payload. Anything that fails is logged and
    /// rejected without being forwarded.
    fn validate(&self, payload: &Value) -> bool;

    /// Returns the challenge to echo back when the subscription handshake
    /// succeeds.
    fn verify(&self, query: &VerificationQuery) -> Option<String>;

    /// Whether inbound signature headers are copied onto forwarded requests.
    fn preserves_signature_headers(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub enum Provider {
    Facebook(FacebookProvider),
    Instagram(InstagramProvider),
}

impl WebhookProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Facebook(provider) => provider.name(),
            Provider::Instagram(provider) => provider.name(),
        }
    }

    fn forward_targets(&self) -> &[ForwardTarget] {
        match self {
            Provider::Facebook(provider) => provider.forward_targets(),
            Provider::Instagram(provider) => provider.forward_targets(),
        }
    }

    fn validate(&self, payload: &Value) -> bool {
        match self {
            Provider::Facebook(provider) => provider.validate(payload),
            Provider::Instagram(provider) => provider.validate(payload),
        }
    }

    fn verify(&self, query: &VerificationQuery) -> Option<String> {
        match self {
            Provider::Facebook(provider) => provider.verify(query),
            Provider::Instagram(provider) => provider.verify(query),
        }
    }

    fn preserves_signature_headers(&self) -> bool {
        match self {
            Provider::Facebook(provider) => provider.preserves_signature_headers(),
            Provider::Instagram(provider) => provider.preserves_signature_headers(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(vec![
            Provider::Facebook(FacebookProvider::new(
                config.facebook.forward_targets.clone(),
                config.facebook.verify_token.clone(),
            )),
            Provider::Instagram(InstagramProvider::new(
                config.instagram.forward_targets.clone(),
                config.instagram.verify_token.clone(),
            )),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.name().to_string())
            .collect()
    }

    pub fn info(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|provider| ProviderInfo {
                name: provider.name().to_string(),
                forward_targets: provider.forward_targets().to_vec(),
            })
            .collect()
    }
}
