use crate::{
    api::{AppState, extract::AccountId},
    core::wallet,
    entities::{RechargeModel, WalletModel},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

/// Wallet routes. Owners can read their recharges but never credit themselves;
/// crediting lives under `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wallet", post(open_wallet).get(get_wallet))
        .route("/wallet/recharges", get(list_recharges))
        .route("/wallet/recharge-instructions", get(recharge_instructions))
}

/// What the owner needs to top up by UPI transfer.
#[derive(Debug, Serialize)]
pub struct RechargeInstructions {
    /// UPI id the payment goes to
    pub upi_id: String,
    /// Amount for one validity period
    pub amount: f64,
    /// Symbol to show next to the amount
    pub currency_symbol: String,
    /// Days a recharge keeps catalogs live
    pub validity_days: i64,
}

async fn open_wallet(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> Result<(StatusCode, Json<WalletModel>)> {
    let wallet = wallet::open_wallet(&state.db, &account_id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

async fn get_wallet(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> Result<Json<wallet::WalletStatus>> {
    let status =
        wallet::get_wallet_status(&state.db, &account_id, Utc::now(), &state.settings.policy)
            .await?;
    Ok(Json(status))
}

async fn list_recharges(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> Result<Json<Vec<RechargeModel>>> {
    Ok(Json(wallet::list_recharges(&state.db, &account_id).await?))
}

async fn recharge_instructions(
    State(state): State<AppState>,
    _account: AccountId,
) -> Json<RechargeInstructions> {
    let recharge = &state.settings.recharge;
    Json(RechargeInstructions {
        upi_id: recharge.upi_id.clone(),
        amount: recharge.amount,
        currency_symbol: recharge.currency_symbol.clone(),
        validity_days: state.settings.policy.expire_after_days,
    })
}
