//! Recharge entity - Append-only ledger of wallet top-ups.
//!
//! Each row matches exactly one balance increment and one `last_recharge_at` update.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recharge database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recharges")]
pub struct Model {
    /// Unique identifier for the recharge
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account whose wallet was recharged
    pub account_id: String,
    /// Amount added to the balance
    pub amount: f64,
    /// Optional payment remark, e.g. a UPI transaction id
    pub reference: Option<String>,
    /// When the recharge was applied
    pub recharged_at: DateTimeUtc,
}

/// `Recharge` has no foreign-key relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
