use serde::Deserialize;

use crate::auth::constant_time_eq;

/// Query parameters of the `hub.*` subscription handshake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Accepts `mode=subscribe` with a matching token and a non-empty challenge.
/// A provider without a configured token never verifies.
pub fn verify_subscription(query: &VerificationQuery, expected_token: Option<&str>) -> Option<String> {
    let expected_token = expected_token.filter(|token| !token.is_empty())?;
    if query.mode.as_deref() != Some("subscribe") {
        return None;
    }
    let provided_token = query.verify_token.as_deref()?;
    let challenge = query.challenge.as_deref().filter(|value| !value.is_empty())?;

    if constant_time_eq(expected_token.as_bytes(), provided_token.as_bytes()) {
        Some(challenge.to_string())
    } else {
        None
    }
}
