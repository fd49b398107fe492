use crate::{
    api::{AppState, extract::AccountId},
    core::dashboard::{self, DashboardView},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

/// Dashboard routes
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(load_dashboard))
}

/// Loads the owner's dashboard, applying expiry first when it is due.
async fn load_dashboard(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> Result<Json<DashboardView>> {
    let view =
        dashboard::load_dashboard(&state.db, &account_id, Utc::now(), &state.settings.policy)
            .await?;
    Ok(Json(view))
}
