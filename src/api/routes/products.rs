use crate::{
    api::{
        AppState,
        extract::{AccountId, AppJson, AppPath},
    },
    core::product::{self, NewProduct, ProductChanges},
    entities::ProductModel,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{post, put},
};
use chrono::Utc;

/// Product routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/catalogs/:id/products",
            post(add_product).get(list_products),
        )
        .route("/products/:id", put(update_product).delete(delete_product))
}

async fn add_product(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(catalog_id): AppPath<i64>,
    AppJson(body): AppJson<NewProduct>,
) -> Result<(StatusCode, Json<ProductModel>)> {
    let created = product::add_product(&state.db, &owner_id, catalog_id, body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_products(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(catalog_id): AppPath<i64>,
) -> Result<Json<Vec<ProductModel>>> {
    Ok(Json(product::list_products(&state.db, &owner_id, catalog_id).await?))
}

async fn update_product(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<ProductChanges>,
) -> Result<Json<ProductModel>> {
    let updated = product::update_product(&state.db, &owner_id, id, body, Utc::now()).await?;
    Ok(Json(updated))
}

async fn delete_product(
    State(state): State<AppState>,
    AccountId(owner_id): AccountId,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    product::delete_product(&state.db, &owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
