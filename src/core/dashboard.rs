//! Dashboard loading - the one place the expiry policy is applied.
//!
//! Loading runs in a fixed order: fetch the wallet, evaluate the policy (pure), apply
//! the expiry transition if the verdict demands it, then list the catalogs. The result
//! is a plain [`DashboardView`] for the presentation layer; nothing here renders.

use crate::{
    config::PolicySettings,
    core::{
        policy::{self, Verdict},
        store::AccountStore,
    },
    entities::{catalog, wallet},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// The catalog fields shown on the owner's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Catalog id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Public slug
    pub slug: String,
    /// WhatsApp number orders go to
    pub contact_handle: String,
    /// Whether the catalog is publicly resolvable
    pub is_live: bool,
}

impl From<catalog::Model> for CatalogSummary {
    fn from(model: catalog::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            slug: model.slug,
            contact_handle: model.contact_handle,
            is_live: model.is_live,
        }
    }
}

/// Everything the dashboard needs after one load
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Account the dashboard belongs to
    pub account_id: String,
    /// Wallet balance after any expiry was applied
    pub balance: f64,
    /// Whole days since the last recharge (or creation)
    pub elapsed_days: i64,
    /// Policy verdict for this load
    pub verdict: Verdict,
    /// Set when the wallet has no usable timestamp
    pub integrity_defect: bool,
    /// The account's catalogs, ordered by name
    pub catalogs: Vec<CatalogSummary>,
}

fn unavailable(resource: &'static str, cause: &Error) -> Error {
    Error::DataUnavailable {
        resource,
        reason: cause.to_string(),
    }
}

async fn fetch_wallet<S>(store: &S, account_id: &str) -> Result<wallet::Model>
where
    S: AccountStore,
{
    store
        .get_wallet(account_id)
        .await
        .map_err(|e| unavailable("wallet", &e))?
        .ok_or_else(|| {
            unavailable(
                "wallet",
                &Error::WalletNotFound {
                    account_id: account_id.to_string(),
                },
            )
        })
}

/// Loads the dashboard for `account_id`, applying the expiry transition when due.
///
/// Safe to call again after any failure: a partially applied expiry leaves the balance
/// positive, so the next load re-evaluates to `Expire` and retries.
///
/// # Errors
/// - `Error::DataUnavailable` when the wallet or catalogs cannot be loaded, or the
///   account has no wallet
/// - `Error::PartialExpiryFailure` when the expiry transition did not complete
#[instrument(skip(store, thresholds))]
pub async fn load_dashboard<S>(
    store: &S,
    account_id: &str,
    now: DateTime<Utc>,
    thresholds: &PolicySettings,
) -> Result<DashboardView>
where
    S: AccountStore,
{
    let wallet = fetch_wallet(store, account_id).await?;
    let mut evaluation = policy::evaluate(&wallet, now, thresholds);

    if evaluation.has_integrity_defect() {
        let defect = Error::IntegrityDefect {
            account_id: account_id.to_string(),
        };
        warn!("{}; expiry skipped", defect);
    }

    let mut balance = wallet.balance;
    if evaluation.verdict == Verdict::Expire {
        if store.expire_account(&wallet).await? {
            info!(
                "Wallet for {} expired after {} days; balance {:.2} cleared and catalogs hidden",
                account_id, evaluation.elapsed_days, balance
            );
            balance = 0.0;
        } else {
            // Recharged after it was read; report the wallet as stored now
            let current = fetch_wallet(store, account_id).await?;
            evaluation = policy::evaluate(&current, now, thresholds);
            balance = current.balance;
        }
    }

    let catalogs = store
        .list_catalogs(account_id)
        .await
        .map_err(|e| unavailable("catalogs", &e))?;

    Ok(DashboardView {
        account_id: account_id.to_string(),
        balance,
        elapsed_days: evaluation.elapsed_days,
        verdict: evaluation.verdict,
        integrity_defect: evaluation.has_integrity_defect(),
        catalogs: catalogs.into_iter().map(CatalogSummary::from).collect(),
    })
}
