use crate::{
    api::{
        AppState,
        extract::{AppJson, AppPath, Operator},
    },
    core::wallet,
    entities::{RechargeModel, WalletModel},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

/// Operator routes, each guarded by [`Operator`].
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/admin/wallets/:account_id/recharges",
        post(confirm_recharge).get(list_recharges),
    )
}

/// Body of `POST /admin/wallets/:account_id/recharges`
#[derive(Debug, Deserialize)]
pub struct RechargeRequest {
    /// Amount received
    pub amount: f64,
    /// Payment reference, such as a UPI transaction id
    #[serde(default)]
    pub reference: Option<String>,
}

/// Credits a wallet once the operator has seen the UPI payment arrive.
async fn confirm_recharge(
    _operator: Operator,
    State(state): State<AppState>,
    AppPath(account_id): AppPath<String>,
    AppJson(body): AppJson<RechargeRequest>,
) -> Result<Json<WalletModel>> {
    let wallet =
        wallet::recharge_wallet(&state.db, &account_id, body.amount, body.reference, Utc::now())
            .await?;
    info!("Operator confirmed recharge of {:.2} for {}", body.amount, account_id);
    Ok(Json(wallet))
}

async fn list_recharges(
    _operator: Operator,
    State(state): State<AppState>,
    AppPath(account_id): AppPath<String>,
) -> Result<Json<Vec<RechargeModel>>> {
    Ok(Json(wallet::list_recharges(&state.db, &account_id).await?))
}
