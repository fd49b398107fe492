use crate::{
    api::{
        AppState,
        extract::{AccountId, AppJson, AppPath},
    },
    core::catalog::{self, CatalogChanges, NewCatalog},
    entities::CatalogModel,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

/// Catalog routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalogs", post(create_catalog).get(list_catalogs))
        .route(
            "/catalogs/:id",
            get(get_catalog).put(update_catalog).delete(delete_catalog),
        )
        .route("/catalogs/:id/live", post(set_live))
}

/// Body of `POST /catalogs/:id/live`
#[derive(Debug, Deserialize)]
pub struct LiveRequest {
    /// Whether the catalog should be publicly resolvable
    pub is_live: bool,
}

async fn create_catalog(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppJson(body): AppJson<NewCatalog>,
) -> Result<(StatusCode, Json<CatalogModel>)> {
    let created = catalog::create_catalog(&state.db, &owner_id, body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_catalogs(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
) -> Result<Json<Vec<CatalogModel>>> {
    Ok(Json(catalog::list_catalogs_for_owner(&state.db, &owner_id).await?))
}

async fn get_catalog(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CatalogModel>> {
    Ok(Json(catalog::get_catalog_for_owner(&state.db, &owner_id, id).await?))
}

async fn update_catalog(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<CatalogChanges>,
) -> Result<Json<CatalogModel>> {
    let updated = catalog::update_catalog(&state.db, &owner_id, id, body, Utc::now()).await?;
    Ok(Json(updated))
}

async fn delete_catalog(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    catalog::delete_catalog(&state.db, &owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_live(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<LiveRequest>,
) -> Result<Json<CatalogModel>> {
    let updated = catalog::set_catalog_live(
        &state.db,
        &owner_id,
        id,
        body.is_live,
        Utc::now(),
        &state.settings.policy,
    )
    .await?;
    Ok(Json(updated))
}
