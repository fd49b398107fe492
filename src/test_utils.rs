//! Shared test utilities for `CatalogBuddy`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and an in-memory [`AccountStore`]
//! whose reads and writes can be made to fail on demand.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{catalog, product, store::AccountStore},
    entities::{self, wallet},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a wallet whose last recharge was `recharged_days_ago` days before now.
///
/// # Defaults
/// * `created_at`: 60 days ago
pub async fn create_test_wallet(
    db: &DatabaseConnection,
    account_id: &str,
    balance: f64,
    recharged_days_ago: Option<i64>,
) -> Result<entities::wallet::Model> {
    let now = Utc::now();
    create_custom_wallet(
        db,
        account_id,
        balance,
        recharged_days_ago.map(|d| now - Duration::days(d)),
        Some(now - Duration::days(60)),
    )
    .await
}

/// Creates a wallet with explicit timestamps, including missing ones.
pub async fn create_custom_wallet(
    db: &DatabaseConnection,
    account_id: &str,
    balance: f64,
    last_recharge_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
) -> Result<entities::wallet::Model> {
    let wallet = wallet::ActiveModel {
        account_id: Set(account_id.to_string()),
        balance: Set(balance),
        last_recharge_at: Set(last_recharge_at),
        created_at: Set(created_at),
        ..Default::default()
    };
    wallet.insert(db).await.map_err(Into::into)
}

/// Creates a live test catalog.
///
/// # Defaults
/// * `description`: "Test catalog"
/// * `contact_handle`: "+91 98765 43210"
pub async fn create_test_catalog(
    db: &DatabaseConnection,
    owner_id: &str,
    name: &str,
    slug: &str,
) -> Result<entities::catalog::Model> {
    catalog::create_catalog(
        db,
        owner_id,
        catalog::NewCatalog {
            name: name.to_string(),
            description: "Test catalog".to_string(),
            contact_handle: "+91 98765 43210".to_string(),
            slug: slug.to_string(),
        },
        Utc::now(),
    )
    .await
}

/// Adds a product to a test catalog as its owner.
pub async fn create_test_product(
    db: &DatabaseConnection,
    catalog: &entities::catalog::Model,
    name: &str,
    price: f64,
) -> Result<entities::product::Model> {
    product::add_product(
        db,
        &catalog.owner_id,
        catalog.id,
        product::NewProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            image_reference: None,
        },
        Utc::now(),
    )
    .await
}

#[derive(Default)]
struct MemoryState {
    wallets: Vec<wallet::Model>,
    catalogs: Vec<entities::catalog::Model>,
    fail_wallet_reads: bool,
    fail_catalog_reads: bool,
    fail_balance_writes: bool,
    fail_catalog_writes: bool,
    pending_recharge: Option<(String, f64)>,
    writes: usize,
}

impl MemoryState {
    fn credit(&mut self, account_id: &str, amount: f64) {
        if let Some(wallet) = self.wallets.iter_mut().find(|w| w.account_id == account_id) {
            wallet.balance += amount;
            wallet.last_recharge_at = Some(Utc::now());
        }
    }
}

/// In-memory [`AccountStore`] with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

fn injected(operation: &str) -> Error {
    Error::Database(DbErr::Custom(format!("injected {operation} failure")))
}

impl MemoryStore {
    /// Creates an empty store where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wallet recharged `recharged_days_ago` days ago and created 60 days ago.
    pub fn insert_wallet(&self, account_id: &str, balance: f64, recharged_days_ago: Option<i64>) {
        let now = Utc::now();
        self.insert_wallet_timestamps(
            account_id,
            balance,
            recharged_days_ago.map(|d| now - Duration::days(d)),
            Some(now - Duration::days(60)),
        );
    }

    /// Adds a wallet with explicit timestamps.
    pub fn insert_wallet_timestamps(
        &self,
        account_id: &str,
        balance: f64,
        last_recharge_at: Option<DateTime<Utc>>,
        created_at: Option<DateTime<Utc>>,
    ) {
        let mut state = self.state.lock().unwrap();
        let id = i64::try_from(state.wallets.len()).unwrap() + 1;
        state.wallets.push(wallet::Model {
            id,
            account_id: account_id.to_string(),
            balance,
            last_recharge_at,
            created_at,
        });
    }

    /// Adds a catalog owned by `owner_id`.
    pub fn insert_catalog(&self, owner_id: &str, name: &str, is_live: bool) {
        let mut state = self.state.lock().unwrap();
        let id = i64::try_from(state.catalogs.len()).unwrap() + 1;
        let now = Utc::now();
        state.catalogs.push(entities::catalog::Model {
            id,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            contact_handle: "+91 98765 43210".to_string(),
            slug: format!("catalog-{id}"),
            is_live,
            created_at: now,
            updated_at: now,
        });
    }

    /// Credits a wallet the way a confirmed recharge does, outside the store's write count.
    pub fn recharge(&self, account_id: &str, amount: f64) {
        self.state.lock().unwrap().credit(account_id, amount);
    }

    /// Applies a recharge right after the next wallet read has returned its snapshot.
    pub fn recharge_after_next_read(&self, account_id: &str, amount: f64) {
        self.state.lock().unwrap().pending_recharge = Some((account_id.to_string(), amount));
    }

    /// Makes `get_wallet` fail.
    pub fn fail_wallet_reads(&self) {
        self.state.lock().unwrap().fail_wallet_reads = true;
    }

    /// Makes `list_catalogs` fail.
    pub fn fail_catalog_reads(&self) {
        self.state.lock().unwrap().fail_catalog_reads = true;
    }

    /// Makes `set_wallet_balance` fail.
    pub fn fail_balance_writes(&self) {
        self.state.lock().unwrap().fail_balance_writes = true;
    }

    /// Makes `set_catalogs_live` fail.
    pub fn fail_catalog_writes(&self) {
        self.state.lock().unwrap().fail_catalog_writes = true;
    }

    /// Clears every injected failure.
    pub fn heal(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_wallet_reads = false;
        state.fail_catalog_reads = false;
        state.fail_balance_writes = false;
        state.fail_catalog_writes = false;
    }

    /// Current balance of an account's wallet.
    pub fn balance(&self, account_id: &str) -> Option<f64> {
        self.state
            .lock()
            .unwrap()
            .wallets
            .iter()
            .find(|w| w.account_id == account_id)
            .map(|w| w.balance)
    }

    /// Every catalog owned by `owner_id`.
    pub fn catalogs(&self, owner_id: &str) -> Vec<entities::catalog::Model> {
        self.state
            .lock()
            .unwrap()
            .catalogs
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Number of successful write calls so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

impl AccountStore for MemoryStore {
    async fn get_wallet(&self, account_id: &str) -> Result<Option<wallet::Model>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_wallet_reads {
            return Err(injected("wallet read"));
        }
        let snapshot = state
            .wallets
            .iter()
            .find(|w| w.account_id == account_id)
            .cloned();
        if let Some((target, amount)) = state.pending_recharge.take() {
            state.credit(&target, amount);
        }
        Ok(snapshot)
    }

    async fn set_wallet_balance(&self, account_id: &str, amount: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_balance_writes {
            return Err(injected("balance write"));
        }
        let wallet = state
            .wallets
            .iter_mut()
            .find(|w| w.account_id == account_id)
            .ok_or_else(|| Error::WalletNotFound {
                account_id: account_id.to_string(),
            })?;
        wallet.balance = amount;
        state.writes += 1;
        Ok(())
    }

    async fn set_catalogs_live(&self, owner_id: &str, is_live: bool) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if state.fail_catalog_writes {
            return Err(injected("catalog write"));
        }
        let mut touched = 0;
        for catalog in state.catalogs.iter_mut().filter(|c| c.owner_id == owner_id) {
            catalog.is_live = is_live;
            touched += 1;
        }
        state.writes += 1;
        Ok(touched)
    }

    async fn list_catalogs(&self, owner_id: &str) -> Result<Vec<entities::catalog::Model>> {
        let state = self.state.lock().unwrap();
        if state.fail_catalog_reads {
            return Err(injected("catalog read"));
        }
        let mut catalogs: Vec<_> = state
            .catalogs
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        catalogs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(catalogs)
    }
}
