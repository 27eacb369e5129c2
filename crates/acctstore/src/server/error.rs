use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use acctstore_core::accounts::StoreError;

// ==============================================================================
// Error Type
// ==============================================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub(super) fn map_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::UnknownField(_) => AppError::BadRequest(err.to_string()),
        StoreError::Encode(_) | StoreError::Storage(_) => {
            tracing::error!(error = %err, "account store failure");
            AppError::Internal(err.to_string())
        }
    }
}
