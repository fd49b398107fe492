//! Product business logic - Handles all product-related operations.
//!
//! Products are always reached through their parent catalog, so every function checks
//! that the catalog belongs to the caller. A product in someone else's catalog is
//! reported as not found.

use crate::{
    entities::{Catalog, Product, catalog, product},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields required to add a product
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Description, may be empty
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Image reference in external storage
    #[serde(default)]
    pub image_reference: Option<String>,
}

/// Partial update of a product; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New image reference
    pub image_reference: Option<String>,
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: "Product name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(price)
}

fn clean_image_reference(reference: Option<String>) -> Option<String> {
    reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

async fn owned_catalog(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
) -> Result<catalog::Model> {
    Catalog::find_by_id(catalog_id)
        .one(db)
        .await?
        .filter(|c| c.owner_id == owner_id)
        .ok_or_else(|| Error::CatalogNotFound {
            id: catalog_id.to_string(),
        })
}

async fn owned_product(
    db: &DatabaseConnection,
    owner_id: &str,
    product_id: i64,
) -> Result<product::Model> {
    let found = Product::find_by_id(product_id)
        .find_also_related(Catalog)
        .one(db)
        .await?;

    match found {
        Some((product, Some(catalog))) if catalog.owner_id == owner_id => Ok(product),
        _ => Err(Error::ProductNotFound { id: product_id }),
    }
}

/// Adds a product to one of the caller's catalogs.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The catalog does not exist or belongs to someone else
/// - The database insert fails
#[instrument(skip(db, input))]
pub async fn add_product(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
    input: NewProduct,
    now: DateTime<Utc>,
) -> Result<product::Model> {
    let name = validate_name(&input.name)?;
    let price = validate_price(input.price)?;
    let catalog = owned_catalog(db, owner_id, catalog_id).await?;

    let product = product::ActiveModel {
        catalog_id: Set(catalog.id),
        name: Set(name),
        description: Set(input.description.trim().to_string()),
        price: Set(price),
        image_reference: Set(clean_image_reference(input.image_reference)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = product.insert(db).await?;
    info!("Added product {} to catalog {}", created.id, catalog_id);
    Ok(created)
}

/// Lists the products in one of the caller's catalogs, ordered by name.
pub async fn list_products(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
) -> Result<Vec<product::Model>> {
    let catalog = owned_catalog(db, owner_id, catalog_id).await?;
    catalog
        .find_related(Product)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to one of the caller's products.
///
/// Setting `image_reference` to an empty string clears the image.
#[instrument(skip(db, changes))]
pub async fn update_product(
    db: &DatabaseConnection,
    owner_id: &str,
    product_id: i64,
    changes: ProductChanges,
    now: DateTime<Utc>,
) -> Result<product::Model> {
    let existing = owned_product(db, owner_id, product_id).await?;
    let mut active: product::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(description) = changes.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(price) = changes.price {
        active.price = Set(validate_price(price)?);
    }
    if let Some(reference) = changes.image_reference {
        active.image_reference = Set(clean_image_reference(Some(reference)));
    }

    active.updated_at = Set(now);
    active.update(db).await.map_err(Into::into)
}

/// Deletes one of the caller's products.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, owner_id: &str, product_id: i64) -> Result<()> {
    let product = owned_product(db, owner_id, product_id).await?;
    Product::delete_by_id(product.id).exec(db).await?;
    info!("Deleted product {}", product_id);
    Ok(())
}
