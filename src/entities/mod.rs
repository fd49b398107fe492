//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod catalog;
pub mod product;
pub mod profile;
pub mod recharge;
pub mod wallet;

// Re-export specific types to avoid conflicts
pub use catalog::{Column as CatalogColumn, Entity as Catalog, Model as CatalogModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use recharge::{Column as RechargeColumn, Entity as Recharge, Model as RechargeModel};
pub use wallet::{Column as WalletColumn, Entity as Wallet, Model as WalletModel};
