//! Wallet business logic - Opening wallets, recharging them and reporting their standing.
//!
//! The balance only ever grows here. It is reset to zero exclusively by the expiry
//! transition in `core::store`.

use crate::{
    config::PolicySettings,
    core::{policy, store::find_wallet},
    entities::{Recharge, Wallet, recharge, wallet},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use tracing::{info, instrument};

/// A wallet together with its current policy evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct WalletStatus {
    /// The stored wallet
    pub wallet: wallet::Model,
    /// Whole days since the last recharge (or creation)
    pub elapsed_days: i64,
    /// Current policy verdict
    pub verdict: policy::Verdict,
    /// Whether the owner may currently publish catalogs
    pub in_good_standing: bool,
}

/// Creates a zero-balance wallet for a newly registered account.
///
/// Registration may be retried by the identity provider, so an existing wallet is
/// returned unchanged instead of failing.
#[instrument(skip(db))]
pub async fn open_wallet(
    db: &DatabaseConnection,
    account_id: &str,
    now: DateTime<Utc>,
) -> Result<wallet::Model> {
    if account_id.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Account id cannot be empty".to_string(),
        });
    }

    if let Some(existing) = find_wallet(db, account_id).await? {
        return Ok(existing);
    }

    let wallet = wallet::ActiveModel {
        account_id: Set(account_id.to_string()),
        balance: Set(0.0),
        last_recharge_at: Set(None),
        created_at: Set(Some(now)),
        ..Default::default()
    };

    match wallet.insert(db).await {
        Ok(created) => {
            info!("Opened wallet for account {}", account_id);
            Ok(created)
        }
        // A concurrent registration won the insert
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            get_wallet(db, account_id).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Finds the wallet for an account, failing with `WalletNotFound` if there is none.
pub async fn get_wallet(db: &DatabaseConnection, account_id: &str) -> Result<wallet::Model> {
    find_wallet(db, account_id)
        .await?
        .ok_or_else(|| Error::WalletNotFound {
            account_id: account_id.to_string(),
        })
}

/// Evaluates a wallet against the expiry policy without applying anything.
pub async fn get_wallet_status(
    db: &DatabaseConnection,
    account_id: &str,
    now: DateTime<Utc>,
    thresholds: &PolicySettings,
) -> Result<WalletStatus> {
    let wallet = get_wallet(db, account_id).await?;
    let evaluation = policy::evaluate(&wallet, now, thresholds);
    let in_good_standing = policy::is_in_good_standing(&wallet, now, thresholds);

    Ok(WalletStatus {
        wallet,
        elapsed_days: evaluation.elapsed_days,
        verdict: evaluation.verdict,
        in_good_standing,
    })
}

/// Records a top-up and credits it to the wallet.
///
/// The ledger row, the balance increment, and the new `last_recharge_at` are written in
/// one transaction. The increment is done in SQL (`balance = balance + amount`) so that
/// concurrent recharges cannot lose updates.
///
/// # Errors
/// Returns an error if:
/// - The amount is zero, negative, or not finite
/// - The account has no wallet
/// - A database operation fails
#[instrument(skip(db))]
pub async fn recharge_wallet(
    db: &DatabaseConnection,
    account_id: &str,
    amount: f64,
    reference: Option<String>,
    now: DateTime<Utc>,
) -> Result<wallet::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    let wallet = find_wallet(&txn, account_id)
        .await?
        .ok_or_else(|| Error::WalletNotFound {
            account_id: account_id.to_string(),
        })?;

    let entry = recharge::ActiveModel {
        account_id: Set(account_id.to_string()),
        amount: Set(amount),
        reference: Set(reference.filter(|r| !r.trim().is_empty())),
        recharged_at: Set(now),
        ..Default::default()
    };
    entry.insert(&txn).await?;

    Wallet::update_many()
        .col_expr(
            wallet::Column::Balance,
            Expr::col(wallet::Column::Balance).add(amount),
        )
        .col_expr(wallet::Column::LastRechargeAt, Expr::value(now))
        .filter(wallet::Column::Id.eq(wallet.id))
        .exec(&txn)
        .await?;

    let updated = Wallet::find_by_id(wallet.id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::WalletNotFound {
            account_id: account_id.to_string(),
        })?;

    txn.commit().await?;

    info!(
        "Recharged wallet for {} by {:.2}, balance now {:.2}",
        account_id, amount, updated.balance
    );
    Ok(updated)
}

/// Lists every recharge for an account, newest first.
pub async fn list_recharges(
    db: &DatabaseConnection,
    account_id: &str,
) -> Result<Vec<recharge::Model>> {
    Recharge::find()
        .filter(recharge::Column::AccountId.eq(account_id))
        .order_by_desc(recharge::Column::RechargedAt)
        .order_by_desc(recharge::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
