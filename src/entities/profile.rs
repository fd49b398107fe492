//! Profile entity - Owner contact and business details.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identifier of the owning account
    #[sea_orm(unique)]
    pub account_id: String,
    /// Owner's name
    pub name: String,
    /// Owner's phone number
    pub phone: String,
    /// Business name
    pub business: String,
    /// Country of business
    pub country: String,
    /// Contact email, if given
    pub email: Option<String>,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last changed
    pub updated_at: DateTimeUtc,
}

/// `Profile` is linked to the rest of the account by account id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
