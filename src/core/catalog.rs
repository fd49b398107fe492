//! Catalog business logic - Creating, editing, publishing and resolving catalogs.
//!
//! Every owner-facing function takes the caller's account id and treats catalogs owned
//! by someone else exactly like missing ones. The public lookup only ever resolves live
//! catalogs.

use crate::{
    config::PolicySettings,
    core::{ordering, policy, store::find_wallet},
    entities::{Catalog, Product, catalog, product},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

const MAX_SLUG_LEN: usize = 64;

/// Fields required to create a catalog
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalog {
    /// Display name
    pub name: String,
    /// Description, may be empty
    #[serde(default)]
    pub description: String,
    /// WhatsApp number orders are sent to
    pub contact_handle: String,
    /// Requested public slug, normalized by [`normalize_slug`]
    pub slug: String,
}

/// Partial update of a catalog; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogChanges {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New WhatsApp number
    pub contact_handle: Option<String>,
    /// New public slug
    pub slug: Option<String>,
}

/// A product as shown on the public page, with its ready-made order link
#[derive(Debug, Clone, Serialize)]
pub struct PublicProduct {
    /// Product id
    pub id: i64,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Image reference in external storage
    pub image_reference: Option<String>,
    /// `wa.me` link that starts an order chat for this product
    pub order_link: String,
}

/// A live catalog as resolved by its public slug
#[derive(Debug, Clone, Serialize)]
pub struct PublicCatalog {
    /// Catalog id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Public slug
    pub slug: String,
    /// Products, ordered by name
    pub products: Vec<PublicProduct>,
}

/// Normalizes a requested slug: trims it and joins whitespace-separated words with `_`.
///
/// # Errors
/// Returns `Error::InvalidInput` unless the result is 1 to 64 characters of ASCII
/// letters, digits, `_` or `-`.
pub fn normalize_slug(raw: &str) -> Result<String> {
    let slug = raw.split_whitespace().collect::<Vec<_>>().join("_");

    if slug.is_empty() {
        return Err(Error::InvalidInput {
            message: "Slug cannot be empty".to_string(),
        });
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(Error::InvalidInput {
            message: format!("Slug cannot be longer than {MAX_SLUG_LEN} characters"),
        });
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidInput {
            message: format!("Slug '{slug}' may only contain letters, digits, '_' and '-'"),
        });
    }

    Ok(slug)
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: "Catalog name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_contact_handle(handle: &str) -> Result<String> {
    let trimmed = handle.trim();
    if ordering::contact_digits(trimmed).is_empty() {
        return Err(Error::InvalidInput {
            message: "Contact handle must be a phone number".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

async fn ensure_slug_available<C>(db: &C, slug: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = Catalog::find()
        .filter(catalog::Column::Slug.eq(slug))
        .one(db)
        .await?;

    match existing {
        Some(other) if Some(other.id) != except_id => Err(Error::SlugTaken {
            slug: slug.to_string(),
        }),
        _ => Ok(()),
    }
}

fn map_slug_conflict(err: DbErr, slug: &str) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::SlugTaken {
            slug: slug.to_string(),
        }
    } else {
        err.into()
    }
}

/// Creates a live catalog for `owner_id`.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, the contact handle has no digits, or the slug is invalid
/// - Another catalog already uses the slug
/// - The database insert fails
#[instrument(skip(db, input))]
pub async fn create_catalog(
    db: &DatabaseConnection,
    owner_id: &str,
    input: NewCatalog,
    now: DateTime<Utc>,
) -> Result<catalog::Model> {
    let name = validate_name(&input.name)?;
    let contact_handle = validate_contact_handle(&input.contact_handle)?;
    let slug = normalize_slug(&input.slug)?;

    ensure_slug_available(db, &slug, None).await?;

    let catalog = catalog::ActiveModel {
        owner_id: Set(owner_id.to_string()),
        name: Set(name),
        description: Set(input.description.trim().to_string()),
        contact_handle: Set(contact_handle),
        slug: Set(slug.clone()),
        is_live: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = catalog
        .insert(db)
        .await
        .map_err(|e| map_slug_conflict(e, &slug))?;
    info!("Created catalog {} ({}) for {}", created.id, created.slug, owner_id);
    Ok(created)
}

async fn find_owned<C>(db: &C, owner_id: &str, catalog_id: i64) -> Result<catalog::Model>
where
    C: ConnectionTrait,
{
    Catalog::find_by_id(catalog_id)
        .one(db)
        .await?
        .filter(|c| c.owner_id == owner_id)
        .ok_or_else(|| Error::CatalogNotFound {
            id: catalog_id.to_string(),
        })
}

/// Fetches one of the caller's catalogs.
pub async fn get_catalog_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
) -> Result<catalog::Model> {
    find_owned(db, owner_id, catalog_id).await
}

/// Lists the caller's catalogs, ordered by name.
pub async fn list_catalogs_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<Vec<catalog::Model>> {
    Catalog::find()
        .filter(catalog::Column::OwnerId.eq(owner_id))
        .order_by_asc(catalog::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to one of the caller's catalogs.
///
/// Changed fields go through the same validation as [`create_catalog`].
#[instrument(skip(db, changes))]
pub async fn update_catalog(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
    changes: CatalogChanges,
    now: DateTime<Utc>,
) -> Result<catalog::Model> {
    let existing = find_owned(db, owner_id, catalog_id).await?;
    let mut active: catalog::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(description) = changes.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(handle) = changes.contact_handle {
        active.contact_handle = Set(validate_contact_handle(&handle)?);
    }

    let mut new_slug = None;
    if let Some(raw) = changes.slug {
        let slug = normalize_slug(&raw)?;
        ensure_slug_available(db, &slug, Some(catalog_id)).await?;
        active.slug = Set(slug.clone());
        new_slug = Some(slug);
    }

    active.updated_at = Set(now);
    active.update(db).await.map_err(|e| match &new_slug {
        Some(slug) => map_slug_conflict(e, slug),
        None => e.into(),
    })
}

/// Publishes or hides one of the caller's catalogs.
///
/// Hiding is always allowed. Publishing requires the owner's wallet to be in good
/// standing (positive balance, not past its expiry age).
///
/// # Errors
/// Returns `Error::WalletInactive` when publishing with a lapsed, empty, or missing wallet.
#[instrument(skip(db, thresholds))]
pub async fn set_catalog_live(
    db: &DatabaseConnection,
    owner_id: &str,
    catalog_id: i64,
    is_live: bool,
    now: DateTime<Utc>,
    thresholds: &PolicySettings,
) -> Result<catalog::Model> {
    let existing = find_owned(db, owner_id, catalog_id).await?;

    if is_live {
        let in_good_standing = find_wallet(db, owner_id)
            .await?
            .is_some_and(|w| policy::is_in_good_standing(&w, now, thresholds));
        if !in_good_standing {
            return Err(Error::WalletInactive {
                account_id: owner_id.to_string(),
            });
        }
    }

    if existing.is_live == is_live {
        return Ok(existing);
    }

    let mut active: catalog::ActiveModel = existing.into();
    active.is_live = Set(is_live);
    active.updated_at = Set(now);
    let updated = active.update(db).await?;
    info!("Catalog {} is_live set to {}", catalog_id, is_live);
    Ok(updated)
}

/// Deletes one of the caller's catalogs together with all of its products.
#[instrument(skip(db))]
pub async fn delete_catalog(db: &DatabaseConnection, owner_id: &str, catalog_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let catalog = find_owned(&txn, owner_id, catalog_id).await?;

    let products = Product::delete_many()
        .filter(product::Column::CatalogId.eq(catalog.id))
        .exec(&txn)
        .await?;
    Catalog::delete_by_id(catalog.id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        "Deleted catalog {} and {} products",
        catalog_id, products.rows_affected
    );
    Ok(())
}

/// Resolves a live catalog by slug for the public page.
///
/// Hidden catalogs are reported exactly like missing ones.
pub async fn get_public_catalog(
    db: &DatabaseConnection,
    slug: &str,
    currency_symbol: &str,
) -> Result<PublicCatalog> {
    let catalog = Catalog::find()
        .filter(catalog::Column::Slug.eq(slug))
        .filter(catalog::Column::IsLive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| Error::CatalogNotFound {
            id: slug.to_string(),
        })?;

    let products = catalog
        .find_related(Product)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?;

    let products = products
        .into_iter()
        .map(|p| {
            let order_link =
                ordering::order_link(&catalog.contact_handle, &p.name, p.price, currency_symbol)?;
            Ok(PublicProduct {
                id: p.id,
                name: p.name,
                description: p.description,
                price: p.price,
                image_reference: p.image_reference,
                order_link,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PublicCatalog {
        id: catalog.id,
        name: catalog.name,
        description: catalog.description,
        slug: catalog.slug,
        products,
    })
}
