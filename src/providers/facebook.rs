use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{VerificationQuery, WebhookProvider, verify_subscription};
use crate::types::ForwardTarget;

// Shape checks only; the fields are never read.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct FacebookWebhook {
    object: String,
    entry: Vec<FacebookEntry>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct FacebookEntry {
    id: String,
    time: f64,
    messaging: Option<Vec<Value>>,
    changes: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct FacebookProvider {
    forward_targets: Vec<ForwardTarget>,
    verify_token: Option<String>,
}

impl FacebookProvider {
    pub fn new(forward_targets: Vec<ForwardTarget>, verify_token: Option<String>) -> Self {
        Self {
            forward_targets,
            verify_token,
        }
    }
}

impl WebhookProvider for FacebookProvider {
    fn name(&self) -> &'static str {
        "facebook"
    }

    fn forward_targets(&self) -> &[ForwardTarget] {
        &self.forward_targets
    }

    fn validate(&self, payload: &Value) -> bool {
        match FacebookWebhook::deserialize(payload) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "facebook payload failed validation");
                false
            }
        }
    }

    fn verify(&self, query: &VerificationQuery) -> Option<String> {
        verify_subscription(query, self.verify_token.as_deref())
    }
}
