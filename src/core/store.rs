//! Account store - the persistence operations the expiry policy depends on.
//!
//! [`AccountStore`] is deliberately narrow: fetch a wallet, overwrite its balance,
//! flip the visibility of every catalog an account owns, and list those catalogs.
//! The SeaORM connection implements it directly; tests use an in-memory double.

use crate::{
    entities::{Catalog, Wallet, catalog, wallet},
    errors::{Error, ExpiryStep, Result},
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use std::future::Future;
use tracing::{debug, info, instrument, warn};

/// Persistence operations used by the dashboard loader and the expiry transition.
pub trait AccountStore: Send + Sync {
    /// Fetches the wallet for an account, `None` if the account has none.
    fn get_wallet(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Option<wallet::Model>>> + Send;

    /// Overwrites the balance of an account's wallet.
    fn set_wallet_balance(
        &self,
        account_id: &str,
        amount: f64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Sets `is_live` on every catalog owned by the account, returning the rows touched.
    fn set_catalogs_live(
        &self,
        owner_id: &str,
        is_live: bool,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Lists every catalog owned by the account, ordered by name.
    fn list_catalogs(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<catalog::Model>>> + Send;

    /// Applies the expiry transition to the wallet the policy judged, returning
    /// whether anything was written.
    ///
    /// The wallet is re-read first. If it was recharged or emptied since `observed`
    /// was loaded, the verdict no longer holds and nothing is written. Otherwise every
    /// catalog is hidden and then the balance zeroed, so that an interruption leaves
    /// the balance positive and the next evaluation retries the whole transition.
    fn expire_account(
        &self,
        observed: &wallet::Model,
    ) -> impl Future<Output = Result<bool>> + Send {
        async move {
            let account_id = observed.account_id.as_str();
            let current = self
                .get_wallet(account_id)
                .await
                .map_err(|e| partial_expiry(account_id, ExpiryStep::ReadWallet, &e))?;
            if !current.is_some_and(|w| still_due(observed, &w)) {
                return Ok(false);
            }

            self.set_catalogs_live(account_id, false)
                .await
                .map_err(|e| partial_expiry(account_id, ExpiryStep::HideCatalogs, &e))?;
            self.set_wallet_balance(account_id, 0.0)
                .await
                .map_err(|e| partial_expiry(account_id, ExpiryStep::ZeroBalance, &e))?;
            Ok(true)
        }
    }
}

/// True when `current` is the same lapsed wallet the policy saw in `observed`.
///
/// Any recharge moves `last_recharge_at`, and an already expired wallet has no balance.
#[must_use]
pub fn still_due(observed: &wallet::Model, current: &wallet::Model) -> bool {
    current.balance > 0.0
        && current.last_recharge_at == observed.last_recharge_at
        && current.created_at == observed.created_at
}

pub(crate) fn partial_expiry(account_id: &str, step: ExpiryStep, cause: &Error) -> Error {
    Error::PartialExpiryFailure {
        account_id: account_id.to_string(),
        step,
        reason: cause.to_string(),
    }
}

/// Fetches a wallet by account id on any connection or transaction.
pub async fn find_wallet<C>(db: &C, account_id: &str) -> Result<Option<wallet::Model>>
where
    C: ConnectionTrait,
{
    Wallet::find()
        .filter(wallet::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn update_wallet_balance<C>(db: &C, account_id: &str, amount: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Wallet::update_many()
        .col_expr(wallet::Column::Balance, Expr::value(amount))
        .filter(wallet::Column::AccountId.eq(account_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::WalletNotFound {
            account_id: account_id.to_string(),
        });
    }
    Ok(())
}

async fn update_catalogs_live<C>(db: &C, owner_id: &str, is_live: bool) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Catalog::update_many()
        .col_expr(catalog::Column::IsLive, Expr::value(is_live))
        .filter(catalog::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

impl AccountStore for DatabaseConnection {
    async fn get_wallet(&self, account_id: &str) -> Result<Option<wallet::Model>> {
        find_wallet(self, account_id).await
    }

    async fn set_wallet_balance(&self, account_id: &str, amount: f64) -> Result<()> {
        update_wallet_balance(self, account_id, amount).await
    }

    async fn set_catalogs_live(&self, owner_id: &str, is_live: bool) -> Result<u64> {
        update_catalogs_live(self, owner_id, is_live).await
    }

    async fn list_catalogs(&self, owner_id: &str) -> Result<Vec<catalog::Model>> {
        Catalog::find()
            .filter(catalog::Column::OwnerId.eq(owner_id))
            .order_by_asc(catalog::Column::Name)
            .all(self)
            .await
            .map_err(Into::into)
    }

    /// The re-check and both writes run in one database transaction; either both
    /// writes land or neither does.
    #[instrument(skip(self, observed), fields(account_id = %observed.account_id))]
    async fn expire_account(&self, observed: &wallet::Model) -> Result<bool> {
        let account_id = observed.account_id.as_str();
        let txn = self.begin().await.map_err(|e| {
            partial_expiry(account_id, ExpiryStep::Transaction, &Error::from(e))
        })?;

        match expire_within(&txn, observed).await {
            Ok(Some(hidden)) => {
                txn.commit().await.map_err(|e| {
                    partial_expiry(account_id, ExpiryStep::Transaction, &Error::from(e))
                })?;
                debug!("Expired account {}: {} catalogs hidden", account_id, hidden);
                Ok(true)
            }
            Ok(None) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback of expiry for {} failed: {}", account_id, rollback_err);
                }
                info!("Expiry for {} skipped: wallet changed since evaluation", account_id);
                Ok(false)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback of expiry for {} failed: {}", account_id, rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Runs the expiry writes inside `db`, returning the number of catalogs hidden, or
/// `None` when the stored wallet no longer matches `observed`.
async fn expire_within<C>(db: &C, observed: &wallet::Model) -> Result<Option<u64>>
where
    C: ConnectionTrait,
{
    let account_id = observed.account_id.as_str();
    let current = find_wallet(db, account_id)
        .await
        .map_err(|e| partial_expiry(account_id, ExpiryStep::ReadWallet, &e))?;
    if !current.is_some_and(|w| still_due(observed, &w)) {
        return Ok(None);
    }

    // Only a wallet that still holds money is zeroed
    let zeroed = Wallet::update_many()
        .col_expr(wallet::Column::Balance, Expr::value(0.0))
        .filter(wallet::Column::AccountId.eq(account_id))
        .filter(wallet::Column::Balance.gt(0.0))
        .exec(db)
        .await
        .map_err(|e| partial_expiry(account_id, ExpiryStep::ZeroBalance, &Error::from(e)))?;
    if zeroed.rows_affected == 0 {
        return Ok(None);
    }

    let hidden = update_catalogs_live(db, account_id, false)
        .await
        .map_err(|e| partial_expiry(account_id, ExpiryStep::HideCatalogs, &e))?;
    Ok(Some(hidden))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_get_wallet_by_account() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_wallet(&db, "acct-1", 40.0, Some(3)).await?;

        let wallet = db.get_wallet("acct-1").await?.unwrap();
        assert_eq!(wallet.balance, 40.0);
        assert!(db.get_wallet("acct-2").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_set_wallet_balance_missing_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        let result = db.set_wallet_balance("nobody", 0.0).await;
        assert!(matches!(result, Err(Error::WalletNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_catalogs_live_only_touches_owner() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_catalog(&db, "acct-1", "Mine", "mine").await?;
        create_test_catalog(&db, "acct-1", "Also Mine", "also-mine").await?;
        create_test_catalog(&db, "acct-2", "Theirs", "theirs").await?;

        let touched = db.set_catalogs_live("acct-1", false).await?;
        assert_eq!(touched, 2);

        assert!(db.list_catalogs("acct-1").await?.iter().all(|c| !c.is_live));
        assert!(db.list_catalogs("acct-2").await?.iter().all(|c| c.is_live));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_catalogs_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_catalog(&db, "acct-1", "Zinnia", "zinnia").await?;
        create_test_catalog(&db, "acct-1", "Aster", "aster").await?;

        let names: Vec<String> = db
            .list_catalogs("acct-1")
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Aster", "Zinnia"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_expire_account_transactional() -> Result<()> {
        let db = setup_test_db().await?;
        let observed = create_test_wallet(&db, "acct-1", 100.0, Some(31)).await?;
        create_test_catalog(&db, "acct-1", "One", "one").await?;

        assert!(db.expire_account(&observed).await?);

        assert_eq!(db.get_wallet("acct-1").await?.unwrap().balance, 0.0);
        assert!(db.list_catalogs("acct-1").await?.iter().all(|c| !c.is_live));

        Ok(())
    }

    #[tokio::test]
    async fn test_expire_account_skips_wallet_recharged_after_evaluation() -> Result<()> {
        let db = setup_test_db().await?;
        let observed = create_test_wallet(&db, "acct-1", 100.0, Some(31)).await?;
        create_test_catalog(&db, "acct-1", "One", "one").await?;

        // A recharge lands between the evaluation and the expiry writes
        crate::core::wallet::recharge_wallet(&db, "acct-1", 199.0, None, Utc::now()).await?;

        assert!(!db.expire_account(&observed).await?);

        let wallet = db.get_wallet("acct-1").await?.unwrap();
        assert_eq!(wallet.balance, 299.0);
        assert!(db.list_catalogs("acct-1").await?.iter().all(|c| c.is_live));

        Ok(())
    }

    #[tokio::test]
    async fn test_expire_account_is_noop_once_expired() -> Result<()> {
        let db = setup_test_db().await?;
        let observed = create_test_wallet(&db, "acct-1", 100.0, Some(31)).await?;
        create_test_catalog(&db, "acct-1", "One", "one").await?;

        assert!(db.expire_account(&observed).await?);
        // Owner republishes by hand; a stale second expiry must not hide it again
        db.set_catalogs_live("acct-1", true).await?;
        assert!(!db.expire_account(&observed).await?);
        assert!(db.list_catalogs("acct-1").await?.iter().all(|c| c.is_live));

        Ok(())
    }

    #[tokio::test]
    async fn test_expire_account_without_wallet_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let observed = create_test_wallet(&db, "acct-1", 100.0, Some(31)).await?;
        create_test_catalog(&db, "acct-1", "One", "one").await?;
        Wallet::delete_by_id(observed.id).exec(&db).await?;

        assert!(!db.expire_account(&observed).await?);
        assert!(db.list_catalogs("acct-1").await?.iter().all(|c| c.is_live));

        Ok(())
    }

    #[test]
    fn test_still_due_detects_recharge() {
        let now = Utc::now();
        let observed = wallet::Model {
            id: 1,
            account_id: "acct-1".to_string(),
            balance: 100.0,
            last_recharge_at: Some(now - Duration::days(31)),
            created_at: Some(now - Duration::days(60)),
        };

        assert!(still_due(&observed, &observed.clone()));

        let recharged = wallet::Model {
            balance: 299.0,
            last_recharge_at: Some(now),
            ..observed.clone()
        };
        assert!(!still_due(&observed, &recharged));

        let emptied = wallet::Model {
            balance: 0.0,
            ..observed.clone()
        };
        assert!(!still_due(&observed, &emptied));
    }

    #[tokio::test]
    async fn test_default_expiry_hides_catalogs_before_zeroing() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_wallet("acct-1", 100.0, Some(31));
        store.insert_catalog("acct-1", "One", true);
        let observed = store.get_wallet("acct-1").await?.unwrap();
        store.fail_balance_writes();

        let result = store.expire_account(&observed).await;
        assert!(matches!(
            result,
            Err(Error::PartialExpiryFailure {
                step: ExpiryStep::ZeroBalance,
                ..
            })
        ));

        // Balance stays positive so the next evaluation retries the transition
        assert_eq!(store.balance("acct-1"), Some(100.0));
        assert!(store.catalogs("acct-1").iter().all(|c| !c.is_live));

        Ok(())
    }

    #[tokio::test]
    async fn test_default_expiry_reports_catalog_failure() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_wallet("acct-1", 100.0, Some(31));
        store.insert_catalog("acct-1", "One", true);
        let observed = store.get_wallet("acct-1").await?.unwrap();
        store.fail_catalog_writes();

        let result = store.expire_account(&observed).await;
        assert!(matches!(
            result,
            Err(Error::PartialExpiryFailure {
                step: ExpiryStep::HideCatalogs,
                ..
            })
        ));
        assert_eq!(store.balance("acct-1"), Some(100.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_default_expiry_skips_recharged_wallet() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_wallet("acct-1", 100.0, Some(31));
        store.insert_catalog("acct-1", "One", true);
        let observed = store.get_wallet("acct-1").await?.unwrap();

        store.recharge("acct-1", 199.0);

        assert!(!store.expire_account(&observed).await?);
        assert_eq!(store.balance("acct-1"), Some(299.0));
        assert!(store.catalogs("acct-1").iter().all(|c| c.is_live));
        assert_eq!(store.write_count(), 0);

        Ok(())
    }
}
