use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::debug;

use super::{VerificationQuery, WebhookProvider, verify_subscription};
use crate::types::ForwardTarget;

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct InstagramWebhook {
    object: String,
    entry: Vec<IgnoredAny>,
}

#[derive(Debug, Clone)]
pub struct InstagramProvider {
    forward_targets: Vec<ForwardTarget>,
    verify_token: Option<String>,
}

impl InstagramProvider {
    pub fn new(forward_targets: Vec<ForwardTarget>, verify_token: Option<String>) -> Self {
        Self {
            forward_targets,
            verify_token,
        }
    }
}

impl WebhookProvider for InstagramProvider {
    fn name(&self) -> &'static str {
        "instagram"
    }

    fn forward_targets(&self) -> &[ForwardTarget] {
        &self.forward_targets
    }

    fn validate(&self, payload: &Value) -> bool {
        match InstagramWebhook::deserialize(payload) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "instagram payload failed validation");
                false
            }
        }
    }

    fn verify(&self, query: &VerificationQuery) -> Option<String> {
        verify_subscription(query, self.verify_token.as_deref())
    }

    // Instagram deliveries are relayed without the inbound signature headers.
    fn preserves_signature_headers(&self) -> bool {
        false
    }
}
