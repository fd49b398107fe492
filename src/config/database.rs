//! Database configuration module for `CatalogBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Catalog, Product, Profile, Recharge, Wallet};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file that is created on first use.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path of a `sqlite://` URL, or `None` for in-memory and non-SQLite databases.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// For a file-backed `SQLite` URL the parent directory is created first, since
/// `mode=rwc` only creates the file itself.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_path(&database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
///
/// Safe to call on each startup; existing tables and their data are left untouched.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Wallet).await?;
    create_table(db, Catalog).await?;
    create_table(db, Product).await?;
    create_table(db, Recharge).await?;
    create_table(db, Profile).await?;

    info!("Database tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let statement = schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CatalogModel, ProductModel, ProfileModel, RechargeModel, WalletModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<WalletModel> = Wallet::find().limit(1).all(&db).await?;
        let _: Vec<CatalogModel> = Catalog::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<RechargeModel> = Recharge::find().limit(1).all(&db).await?;
        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path(DEFAULT_DATABASE_URL),
            Some(Path::new("data/catalog_buddy.sqlite"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
