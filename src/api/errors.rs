//! Maps crate errors onto HTTP responses.
//!
//! Every error body has the shape `{"error": <code>, "message": <text>}`. Load failures
//! on the dashboard additionally carry `"degraded": true` so the client can fall back
//! to a read-only view.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

/// Builds a JSON error response.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn degraded_error(status: StatusCode, code: &'static str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message,
            "degraded": true,
        })),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            Self::InvalidAmount { .. } => (StatusCode::BAD_REQUEST, "invalid_amount"),
            Self::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            Self::WalletNotFound { .. } => (StatusCode::NOT_FOUND, "wallet_not_found"),
            Self::ProfileNotFound { .. } => (StatusCode::NOT_FOUND, "profile_not_found"),
            Self::CatalogNotFound { .. } => (StatusCode::NOT_FOUND, "catalog_not_found"),
            Self::ProductNotFound { .. } => (StatusCode::NOT_FOUND, "product_not_found"),
            Self::SlugTaken { .. } => (StatusCode::CONFLICT, "slug_taken"),
            Self::WalletInactive { .. } => (StatusCode::PAYMENT_REQUIRED, "wallet_inactive"),
            Self::DataUnavailable { .. } => {
                error!("{}", message);
                return degraded_error(StatusCode::SERVICE_UNAVAILABLE, "data_unavailable", message);
            }
            Self::PartialExpiryFailure { .. } => {
                error!("{}", message);
                return degraded_error(StatusCode::SERVICE_UNAVAILABLE, "expiry_incomplete", message);
            }
            Self::IntegrityDefect { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "integrity_defect"),
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
        };

        if status.is_server_error() {
            error!("Request failed: {}", message);
        } else {
            debug!("Request rejected: {}", message);
        }
        json_error(status, code, message)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}
