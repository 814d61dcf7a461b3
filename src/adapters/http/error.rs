//! API error mapping.
//!
//! Domain and port errors converge here and leave as HTTP statuses:
//! validation 400, unknown identifiers 404, feed trouble 502. Backend
//! faults are logged and answered with an opaque 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::domain::error::ValidationError;
use crate::ports::store::StoreError;
use crate::usecases::order_pricing::PricingError;

/// Error shape returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with one message per violation.
    Validation(Vec<ValidationError>),
    /// 404.
    NotFound,
    /// 502: the foreign total could not be computed.
    Upstream(String),
    /// 500: storage backend fault (details only in the log).
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Invalid(errors) => Self::Validation(errors),
            StoreError::Backend(source) => {
                error!(error = %source, "store backend failure");
                Self::Internal
            }
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": messages }))).into_response()
            }
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            Self::Upstream(detail) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "detail": detail }))).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal server error." })),
            )
                .into_response(),
        }
    }
}
