use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    extractors::{ValidPath, ValidQuery},
    log_store::ListLogsParams,
    state::AppState,
    stats::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_REQUESTS, failure_alerts, provider_stats},
    types::{
        AlertsResponse, HealthResponse, ListLogsResponse, ListProvidersResponse, StatsResponse,
        WebhookLog,
    },
};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    limit: Option<i64>,
    provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    threshold: Option<u32>,
    min_requests: Option<u32>,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "webhook-router".to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state.providers.names(),
        timestamp: now_rfc3339(),
    })
}

pub async fn list_logs_handler(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListLogsQuery>,
) -> Result<Json<ListLogsResponse>, ApiError> {
    let limit = parse_limit(query.limit)?;
    let provider = parse_provider(query.provider)?;

    let logs = state.logs.list(&ListLogsParams {
        provider: provider.clone(),
        limit,
    });

    Ok(Json(ListLogsResponse {
        count: count(logs.len()),
        logs,
        provider: provider.unwrap_or_else(|| "all".to_string()),
    }))
}

pub async fn get_log_handler(
    State(state): State<AppState>,
    ValidPath(log_id): ValidPath<String>,
) -> Result<Json<WebhookLog>, ApiError> {
    let log_id = parse_uuid("log_id", &log_id)?;
    state
        .logs
        .get(log_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("log not found"))
}

pub async fn stats_handler(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let provider = parse_provider(query.provider)?;
    let stats = provider_stats(&state.logs, provider.as_deref());

    Ok(Json(StatsResponse {
        stats,
        provider: provider.unwrap_or_else(|| "all".to_string()),
        timestamp: now_rfc3339(),
    }))
}

pub async fn alerts_handler(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<AlertsQuery>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let threshold = query.threshold.unwrap_or(DEFAULT_FAILURE_THRESHOLD);
    let min_requests = query.min_requests.unwrap_or(DEFAULT_MIN_REQUESTS);
    let alerts = failure_alerts(&state.logs, threshold, min_requests);

    Ok(Json(AlertsResponse {
        count: count(alerts.len()),
        alerts,
        threshold,
        min_requests,
    }))
}

pub async fn providers_handler(State(state): State<AppState>) -> Json<ListProvidersResponse> {
    let providers = state.providers.info();
    Json(ListProvidersResponse {
        count: count(providers.len()),
        providers,
    })
}

fn parse_limit(limit: Option<i64>) -> Result<usize, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    Ok(limit as usize)
}

fn parse_provider(provider: Option<String>) -> Result<Option<String>, ApiError> {
    match provider {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::validation("provider must be non-empty"));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::validation(format!("{field} must be a UUID")))
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
