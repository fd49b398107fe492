//! Core business logic - framework-agnostic wallet, catalog, product and policy operations.

/// Catalog creation, editing, publishing and public lookup
pub mod catalog;
/// Dashboard loading, where the expiry policy is applied
pub mod dashboard;
/// WhatsApp order link construction
pub mod ordering;
/// Pure wallet expiry policy
pub mod policy;
/// Product management within a catalog
pub mod product;
/// Owner profile details
pub mod profile;
/// Persistence operations the expiry policy depends on
pub mod store;
/// Wallet opening, recharging and standing
pub mod wallet;
