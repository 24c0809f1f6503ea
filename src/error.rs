use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::types::{ApiErrorCode, ApiErrorResponse};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ApiErrorCode::Validation, message)
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, ApiErrorCode::Unauthorized, message)
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ApiErrorCode::NotFound, message),
        };

        (status, Json(ApiErrorResponse { code, message })).into_response()
    }
}
