//! Unified error type for `CatalogBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps
//! these variants to status codes in one place (`api::errors`).

use std::fmt;
use thiserror::Error;

/// Which part of the expiry transition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStep {
    /// Re-reading the wallet to confirm it is still lapsed
    ReadWallet,
    /// Marking every catalog owned by the account as not live
    HideCatalogs,
    /// Zeroing the wallet balance
    ZeroBalance,
    /// Opening or committing the database transaction wrapping both writes
    Transaction,
}

impl fmt::Display for ExpiryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadWallet => f.write_str("re-read wallet"),
            Self::HideCatalogs => f.write_str("hide catalogs"),
            Self::ZeroBalance => f.write_str("zero balance"),
            Self::Transaction => f.write_str("transaction"),
        }
    }
}

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A monetary amount was negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Request input failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description
        message: String,
    },

    /// No wallet exists for the account
    #[error("No wallet found for account '{account_id}'")]
    WalletNotFound {
        /// Account that was looked up
        account_id: String,
    },

    /// The wallet is empty or lapsed, so sharing features are unavailable
    #[error("Wallet for account '{account_id}' is not in good standing; recharge to share catalogs")]
    WalletInactive {
        /// Account whose wallet was checked
        account_id: String,
    },

    /// The account has not saved a profile yet
    #[error("No profile found for account '{account_id}'")]
    ProfileNotFound {
        /// Account that was looked up
        account_id: String,
    },

    /// Catalog does not exist, is not owned by the caller, or is not live
    #[error("Catalog '{id}' not found")]
    CatalogNotFound {
        /// Catalog id or slug
        id: String,
    },

    /// Product does not exist or is not owned by the caller
    #[error("Product {id} not found")]
    ProductNotFound {
        /// Product id
        id: i64,
    },

    /// Another catalog already uses this slug
    #[error("Slug '{slug}' is already taken")]
    SlugTaken {
        /// The conflicting slug
        slug: String,
    },

    /// Wallet or catalog data could not be loaded
    #[error("Could not load {resource}: {reason}")]
    DataUnavailable {
        /// What was being loaded ("wallet", "catalogs")
        resource: &'static str,
        /// Underlying cause
        reason: String,
    },

    /// One of the two expiry writes failed; the transition is retried on the next load
    #[error("Expiry for account '{account_id}' did not complete ({step} failed): {reason}")]
    PartialExpiryFailure {
        /// Account being expired
        account_id: String,
        /// The write that failed
        step: ExpiryStep,
        /// Underlying cause
        reason: String,
    },

    /// The wallet has neither a recharge nor a creation timestamp
    #[error("Wallet for account '{account_id}' has no recharge or creation timestamp")]
    IntegrityDefect {
        /// Account with the defective wallet
        account_id: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
