use crate::{
    api::{
        AppState,
        extract::{AccountId, AppJson},
    },
    core::profile::{self, ProfileChanges},
    entities::ProfileModel,
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

/// Profile routes
pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(save_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> Result<Json<ProfileModel>> {
    Ok(Json(profile::get_profile(&state.db, &account_id).await?))
}

async fn save_profile(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    AppJson(body): AppJson<ProfileChanges>,
) -> Result<Json<ProfileModel>> {
    let saved = profile::save_profile(&state.db, &account_id, body, Utc::now()).await?;
    Ok(Json(saved))
}
