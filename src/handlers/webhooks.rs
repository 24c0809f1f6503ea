use std::collections::BTreeMap;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::find_provider;
use crate::{
    error::ApiError,
    extractors::{ValidPath, ValidQuery},
    intake::{INVALID_PAYLOAD, IntakeOutcome, handle_event},
    providers::{VerificationQuery, WebhookProvider},
    state::AppState,
    types::IntakeResponse,
};

pub async fn verification_handler(
    State(state): State<AppState>,
    ValidPath(provider): ValidPath<String>,
    ValidQuery(query): ValidQuery<VerificationQuery>,
) -> Result<Response, ApiError> {
    let provider = find_provider(&state, &provider)?;

    match provider.verify(&query) {
        Some(challenge) => {
            info!(provider = provider.name(), "webhook subscription verified");
            Ok(challenge.into_response())
        }
        None => {
            warn!(provider = provider.name(), "webhook subscription verification failed");
            Ok((StatusCode::FORBIDDEN, "Forbidden").into_response())
        }
    }
}

pub async fn intake_handler(
    State(state): State<AppState>,
    ValidPath(provider): ValidPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<IntakeResponse>), ApiError> {
    let provider = find_provider(&state, &provider)?;
    let headers = lowercase_headers(&headers);

    let outcome = handle_event(provider, &state.forwarder, &state.logs, &body, &headers).await;

    Ok(intake_response(outcome))
}

fn intake_response(outcome: IntakeOutcome) -> (StatusCode, Json<IntakeResponse>) {
    match outcome {
        IntakeOutcome::Rejected { log_id } => (
            StatusCode::BAD_REQUEST,
            Json(IntakeResponse {
                success: false,
                message: INVALID_PAYLOAD.to_string(),
                log_id,
                results: None,
                error: None,
            }),
        ),
        IntakeOutcome::Forwarded {
            log_id,
            success,
            success_count,
            results,
        } => (
            StatusCode::OK,
            Json(IntakeResponse {
                success,
                message: format!("Forwarded to {success_count}/{} targets", results.len()),
                log_id,
                results: Some(results),
                error: None,
            }),
        ),
        IntakeOutcome::Failed { log_id, error } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(IntakeResponse {
                success: false,
                message: "Internal server error".to_string(),
                log_id,
                results: None,
                error: Some(error),
            }),
        ),
    }
}

fn lowercase_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}
