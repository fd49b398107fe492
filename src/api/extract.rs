//! Request extractors.
//!
//! Handlers take [`AppJson`] and [`AppPath`] instead of axum's `Json` and `Path` so
//! that malformed requests are answered with the same JSON error body as every other
//! failure.

use crate::{
    api::{AppState, errors::json_error},
    errors::Error,
};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::Response,
};

/// Header carrying the authenticated account id, set by the identity edge.
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The authenticated account making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACCOUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or_else(|| {
                json_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthenticated",
                    format!("missing {ACCOUNT_HEADER} header"),
                )
            })
    }
}

/// An operator authenticated by the `admin.token` bearer token.
///
/// Owner credentials never satisfy this; only the operator confirming a payment does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator;

#[async_trait]
impl FromRequestParts<AppState> for Operator {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = &state.settings.admin;
        if !admin.is_enabled() {
            return Err(json_error(
                StatusCode::FORBIDDEN,
                "admin_disabled",
                "operator access is not configured",
            ));
        }

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if token == admin.token => Ok(Self),
            Some(_) => Err(json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "invalid operator token",
            )),
            None => Err(json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "missing operator bearer token",
            )),
        }
    }
}

/// JSON request body; rejections become `Error::InvalidInput`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// Path parameters; rejections become `Error::InvalidInput`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);
