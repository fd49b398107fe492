//! Application settings loaded from config.toml
//!
//! Every section and field is optional; anything left out takes the default shown on
//! the corresponding `Default` impl. The file location can be overridden with the
//! `CATALOG_BUDDY_CONFIG` environment variable.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const CONFIG_PATH_VAR: &str = "CATALOG_BUDDY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const ADMIN_TOKEN_VAR: &str = "CATALOG_BUDDY_ADMIN_TOKEN";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener settings
    pub server: ServerSettings,
    /// Wallet expiry thresholds
    pub policy: PolicySettings,
    /// Payment details shown to owners when they top up
    pub recharge: RechargeSettings,
    /// Operator access for confirming payments
    pub admin: AdminSettings,
}

/// Operator credentials
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Bearer token required on `/admin` routes; empty disables them
    pub token: String,
}

impl AdminSettings {
    /// Whether operator routes accept requests at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. `"127.0.0.1:8080"`
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Day thresholds for the wallet expiry policy, counted from the last recharge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Elapsed days at which the near-expiry warning starts
    pub warn_after_days: i64,
    /// Elapsed days at which the wallet expires
    pub expire_after_days: i64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            warn_after_days: 25,
            expire_after_days: 30,
        }
    }
}

/// Payment instructions for topping up a wallet
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RechargeSettings {
    /// UPI id payments are sent to
    pub upi_id: String,
    /// Amount charged for one recharge period
    pub amount: f64,
    /// Symbol prefixed to prices in order messages
    pub currency_symbol: String,
}

impl Default for RechargeSettings {
    fn default() -> Self {
        Self {
            upi_id: String::new(),
            amount: 199.0,
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Settings {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.policy;
        if policy.warn_after_days <= 0 || policy.warn_after_days >= policy.expire_after_days {
            return Err(Error::Config {
                message: format!(
                    "policy.warn_after_days ({}) must be positive and below policy.expire_after_days ({})",
                    policy.warn_after_days, policy.expire_after_days
                ),
            });
        }

        if !self.recharge.amount.is_finite() || self.recharge.amount <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "recharge.amount must be a positive number, got {}",
                    self.recharge.amount
                ),
            });
        }

        if self.admin.token != self.admin.token.trim() {
            return Err(Error::Config {
                message: "admin.token cannot have surrounding whitespace".to_string(),
            });
        }

        if self.server.bind.trim().is_empty() {
            return Err(Error::Config {
                message: "server.bind cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads and validates settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value fails [`Settings::validate`]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;

    parse_settings(&contents)
}

/// Parses and validates settings from TOML text
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `CATALOG_BUDDY_CONFIG` (or ./config.toml).
///
/// A missing file is not an error: the defaults are used instead.
/// `CATALOG_BUDDY_ADMIN_TOKEN`, when set, replaces `admin.token` so the secret can
/// stay out of the file.
pub fn load_settings() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut settings = if Path::new(&path).exists() {
        info!("Loading settings from {}", path);
        load_config(&path)?
    } else {
        info!("No settings file at {}, using defaults", path);
        Settings::default()
    };

    if let Ok(token) = std::env::var(ADMIN_TOKEN_VAR) {
        settings.admin.token = token;
    }
    settings.validate()?;

    if !settings.admin.is_enabled() {
        warn!("No admin token configured; recharges cannot be confirmed");
    }
    Ok(settings)
}
