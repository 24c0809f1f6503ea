//! Per-event orchestration: parse, validate, forward, log.
//!
//! Every inbound event produces exactly one log entry, whatever happens to it.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::forwarder::Forwarder;
use crate::log_store::LogStore;
use crate::providers::{Provider, WebhookProvider};
use crate::types::{ForwardResult, NewWebhookLog};

pub const INVALID_PAYLOAD: &str = "Invalid payload structure";

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    /// The payload failed the provider's shape check; nothing was forwarded.
    Rejected { log_id: Uuid },
    Forwarded {
        log_id: Uuid,
        success: bool,
        success_count: usize,
        results: Vec<ForwardResult>,
    },
    /// The event could not be processed at all (e.g. the body was not JSON).
    Failed { log_id: Uuid, error: String },
}

impl IntakeOutcome {
    pub fn log_id(&self) -> Uuid {
        match self {
            IntakeOutcome::Rejected { log_id }
            | IntakeOutcome::Forwarded { log_id, .. }
            | IntakeOutcome::Failed { log_id, .. } => *log_id,
        }
    }
}

#[tracing::instrument(skip_all, fields(provider = provider.name()))]
pub async fn handle_event(
    provider: &Provider,
    forwarder: &Forwarder,
    logs: &LogStore,
    body: &[u8],
    headers: &BTreeMap<String, String>,
) -> IntakeOutcome {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(err) => {
            let message = err.to_string();
            error!(error = %message, "webhook body could not be parsed");
            let log_id = logs.append(NewWebhookLog {
                provider: provider.name().to_string(),
                payload: None,
                results: Vec::new(),
                success: false,
                error: Some(message.clone()),
            });
            return IntakeOutcome::Failed {
                log_id,
                error: message,
            };
        }
    };

    info!("webhook received");

    if !provider.validate(&payload) {
        warn!("webhook payload rejected");
        let log_id = logs.append(NewWebhookLog {
            provider: provider.name().to_string(),
            payload: Some(payload),
            results: Vec::new(),
            success: false,
            error: Some(INVALID_PAYLOAD.to_string()),
        });
        return IntakeOutcome::Rejected { log_id };
    }

    let preserved = provider.preserves_signature_headers().then_some(headers);
    let results = forwarder
        .forward(provider.forward_targets(), &payload, preserved)
        .await;

    let success_count = results.iter().filter(|result| result.success).count();
    // No targets means nothing was delivered, which counts as a failure.
    let success = success_count > 0;
    let error = (!success)
        .then(|| format!("Only {success_count}/{} forwards succeeded", results.len()));

    let log_id = logs.append(NewWebhookLog {
        provider: provider.name().to_string(),
        payload: Some(payload),
        results: results.clone(),
        success,
        error,
    });

    info!(
        log_id = %log_id,
        success,
        success_count,
        targets = results.len(),
        "webhook relayed"
    );

    IntakeOutcome::Forwarded {
        log_id,
        success,
        success_count,
        results,
    }
}
