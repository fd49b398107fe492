use crate::api::{AppState, errors::json_error};
use axum::{Router, http::StatusCode, response::Response, routing::get};

/// Operator routes
pub mod admin;
/// Owner catalog management
pub mod catalogs;
/// Owner dashboard
pub mod dashboard;
/// Products within a catalog
pub mod products;
/// Owner profile
pub mod profile;
/// Public storefront pages
pub mod public;
/// Wallet and recharges
pub mod wallet;

/// Router for every endpoint; account-scoped handlers extract [`AccountId`](crate::api::extract::AccountId) themselves.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(wallet::router())
        .merge(dashboard::router())
        .merge(catalogs::router())
        .merge(products::router())
        .merge(profile::router())
        .merge(public::router())
        .merge(admin::router())
        .fallback(not_found)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "no such route")
}
