use crate::{
    api::{AppState, extract::AppPath},
    core::catalog::{self, PublicCatalog},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

/// Public storefront routes
pub fn router() -> Router<AppState> {
    Router::new().route("/public/:slug", get(public_catalog))
}

/// Unauthenticated storefront view of a live catalog.
async fn public_catalog(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<PublicCatalog>> {
    let catalog =
        catalog::get_public_catalog(&state.db, &slug, &state.settings.recharge.currency_symbol)
            .await?;
    Ok(Json(catalog))
}
