//! Catalog entity - A named, shareable collection of products.
//!
//! Catalogs are addressed publicly by their slug, which is unique across all owners.
//! Only catalogs with `is_live` set are resolvable through the public lookup.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalogs")]
pub struct Model {
    /// Unique identifier for the catalog
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account that owns the catalog
    pub owner_id: String,
    /// Display name (e.g., "Summer Collection")
    pub name: String,
    /// Free-form description shown above the products
    pub description: String,
    /// Messaging-app identifier orders are routed to (a phone number for WhatsApp)
    pub contact_handle: String,
    /// URL-safe public identifier
    #[sea_orm(unique)]
    pub slug: String,
    /// Whether the catalog is publicly resolvable by slug
    pub is_live: bool,
    /// When the catalog was created
    pub created_at: DateTimeUtc,
    /// When the catalog was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Catalog and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One catalog has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
