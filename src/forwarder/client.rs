use std::collections::BTreeMap;
use std::time::Instant;

use futures::future::join_all;
use reqwest::header::{
    CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, USER_AGENT,
};
use tracing::{info, warn};

use super::ForwarderConfig;
use crate::types::{ForwardResult, ForwardTarget};

/// Inbound headers copied onto every outbound request so targets can still
/// verify the origin signature.
pub const PRESERVED_HEADERS: &[&str] = &["x-hub-signature", "x-hub-signature-256"];

#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),
}

#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    config: ForwarderConfig,
    user_agent: HeaderValue,
}

impl Forwarder {
    pub fn new(config: ForwarderConfig) -> Result<Self, ForwarderError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            user_agent,
        })
    }

    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    /// POSTs `payload` to every target concurrently and returns one result per
    /// target, in the order of `targets`.
    #[tracing::instrument(skip_all, fields(targets = targets.len()))]
    pub async fn forward(
        &self,
        targets: &[ForwardTarget],
        payload: &serde_json::Value,
        preserved_headers: Option<&BTreeMap<String, String>>,
    ) -> Vec<ForwardResult> {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(err) => {
                let message = format!("failed to serialize payload: {err}");
                return targets
                    .iter()
                    .map(|target| failure(target, 0, message.clone(), 0))
                    .collect();
            }
        };

        info!("forwarding to {} target(s)", targets.len());

        let requests = targets
            .iter()
            .map(|target| self.forward_one(target, body.clone(), preserved_headers));

        join_all(requests).await
    }

    async fn forward_one(
        &self,
        target: &ForwardTarget,
        body: Vec<u8>,
        preserved_headers: Option<&BTreeMap<String, String>>,
    ) -> ForwardResult {
        let started = Instant::now();

        let headers = match self.build_headers(target, preserved_headers) {
            Ok(headers) => headers,
            Err(message) => {
                warn!(url = %target.url, error = %message, "forward skipped");
                return failure(target, 0, message, elapsed_ms(started));
            }
        };

        let outcome = self
            .client
            .post(&target.url)
            .headers(headers)
            .body(body)
            .send()
            .await;
        let response_time_ms = elapsed_ms(started);

        match outcome {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!(
                        url = %target.url,
                        status = status.as_u16(),
                        response_time_ms,
                        "forward delivered"
                    );
                    ForwardResult {
                        url: target.url.clone(),
                        status: status.as_u16(),
                        success: true,
                        error: None,
                        response_time_ms,
                    }
                } else {
                    let message = format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown Status")
                    );
                    warn!(
                        url = %target.url,
                        status = status.as_u16(),
                        response_time_ms,
                        "forward rejected by target"
                    );
                    failure(target, status.as_u16(), message, response_time_ms)
                }
            }
            Err(err) => {
                let message = if err.is_timeout() {
                    format!("request timed out after {}ms", self.config.timeout_ms)
                } else {
                    err.to_string()
                };
                warn!(
                    url = %target.url,
                    response_time_ms,
                    error = %message,
                    "forward failed"
                );
                failure(target, 0, message, response_time_ms)
            }
        }
    }

    fn build_headers(
        &self,
        target: &ForwardTarget,
        preserved_headers: Option<&BTreeMap<String, String>>,
    ) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        // Target headers replace the defaults above.
        for (name, value) in &target.headers {
            let value = HeaderValue::from_str(value)
                .map_err(|_| format!("invalid value for header {name}"))?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("invalid header name: {name}"))?;
            headers.insert(name, value);
        }

        if let Some(preserved) = preserved_headers {
            for &name in PRESERVED_HEADERS {
                if let Some(value) = preserved.get(name)
                    && !value.is_empty()
                    && let Ok(value) = HeaderValue::from_str(value)
                {
                    headers.insert(HeaderName::from_static(name), value);
                }
            }
        }

        Ok(headers)
    }
}

fn failure(
    target: &ForwardTarget,
    status: u16,
    error: String,
    response_time_ms: u32,
) -> ForwardResult {
    ForwardResult {
        url: target.url.clone(),
        status,
        success: false,
        error: Some(error),
        response_time_ms,
    }
}

fn elapsed_ms(started: Instant) -> u32 {
    u32::try_from(started.elapsed().as_millis()).unwrap_or(u32::MAX)
}
