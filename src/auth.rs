use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::{error::ApiError, state::AppState};

/// Guards the inspector API with a bearer token when one is configured.
pub async fn inspector_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected_token) = &state.inspector_api_token else {
        return Ok(next.run(req).await);
    };

    let Some(provided_token) = bearer_token(req.headers()) else {
        return Err(ApiError::unauthorized(
            "missing or invalid Authorization header",
        ));
    };

    if !constant_time_eq(expected_token.as_bytes(), provided_token.as_bytes()) {
        return Err(ApiError::unauthorized("invalid token"));
    }

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let scheme = value.get(..7)?;
    if scheme.eq_ignore_ascii_case("bearer ") {
        value.get(7..).map(str::trim)
    } else {
        None
    }
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
