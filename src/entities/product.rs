//! Product entity - An item listed in a catalog.
//!
//! Products belong to exactly one catalog and are removed together with it.
//! The image is an opaque reference into external storage.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the catalog this product is listed in
    pub catalog_id: i64,
    /// Name of the product (e.g., "Cotton Kurta")
    pub name: String,
    /// Description shown under the name
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Reference to the product image in external storage
    pub image_reference: Option<String>,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one catalog
    #[sea_orm(
        belongs_to = "super::catalog::Entity",
        from = "Column::CatalogId",
        to = "super::catalog::Column::Id"
    )]
    Catalog,
}

impl Related<super::catalog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Catalog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
