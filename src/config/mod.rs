/// Database connection and table creation
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

pub use settings::{AdminSettings, PolicySettings, RechargeSettings, ServerSettings, Settings, load_settings};
