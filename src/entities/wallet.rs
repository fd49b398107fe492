//! Wallet entity - Per-account balance gating catalog sharing.
//!
//! One wallet per account. The balance grows through recharges and drops to zero
//! only through the expiry transition. Both timestamps are nullable so that records
//! imported from elsewhere can be represented and flagged rather than rejected.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Unique identifier for the wallet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identifier of the owning account, as issued by the identity provider
    #[sea_orm(unique)]
    pub account_id: String,
    /// Current balance in the configured currency
    pub balance: f64,
    /// When the wallet was last recharged, None if never
    pub last_recharge_at: Option<DateTimeUtc>,
    /// When the wallet was created
    pub created_at: Option<DateTimeUtc>,
}

/// `Wallet` is linked to catalogs and recharges by account id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
