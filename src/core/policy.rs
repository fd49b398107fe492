//! Wallet expiry policy - decides catalog visibility from a wallet's age.
//!
//! The evaluation here is pure: it reads a wallet snapshot and the current time and
//! returns a [`Verdict`]. Applying an [`Verdict::Expire`] result (zeroing the balance
//! and hiding the owner's catalogs) is the caller's job; see `core::dashboard`.

use crate::{config::PolicySettings, entities::wallet};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of evaluating a wallet. The variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing to show, nothing to write
    Ok,
    /// The wallet expires soon; show a recharge reminder
    Warn {
        /// Whole days left before the wallet expires
        days_remaining: i64,
    },
    /// The wallet has lapsed with money still on it; the caller must apply the expiry
    Expire,
}

/// Timestamp the elapsed time was measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The most recent recharge
    LastRecharge(DateTime<Utc>),
    /// Wallet creation, used when the wallet was never recharged
    CreatedAt(DateTime<Utc>),
    /// Neither timestamp is present
    Missing,
}

/// Full result of evaluating a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// What the caller should do
    pub verdict: Verdict,
    /// Whole days since the anchor, zero when the anchor is missing
    pub elapsed_days: i64,
    /// Where `elapsed_days` was measured from
    pub anchor: Anchor,
}

impl Evaluation {
    /// True when the wallet carries no usable timestamp.
    #[must_use]
    pub const fn has_integrity_defect(&self) -> bool {
        matches!(self.anchor, Anchor::Missing)
    }
}

/// Whole days between `since` and `now`, rounded down. Timestamps in the future count as zero.
#[must_use]
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_days().max(0)
}

/// Maps elapsed days and balance to a verdict.
///
/// An empty wallet never expires again, which makes re-running the policy after an
/// expiry a no-op.
#[must_use]
pub fn classify(elapsed_days: i64, balance: f64, thresholds: &PolicySettings) -> Verdict {
    if elapsed_days >= thresholds.expire_after_days {
        if balance > 0.0 {
            Verdict::Expire
        } else {
            Verdict::Ok
        }
    } else if elapsed_days >= thresholds.warn_after_days {
        Verdict::Warn {
            days_remaining: thresholds.expire_after_days - elapsed_days,
        }
    } else {
        Verdict::Ok
    }
}

/// Picks the timestamp a wallet's age is measured from.
#[must_use]
pub fn anchor_for(wallet: &wallet::Model) -> Anchor {
    match (wallet.last_recharge_at, wallet.created_at) {
        (Some(recharged), _) => Anchor::LastRecharge(recharged),
        (None, Some(created)) => Anchor::CreatedAt(created),
        (None, None) => Anchor::Missing,
    }
}

/// Evaluates the expiry policy for a wallet at `now`.
#[must_use]
pub fn evaluate(wallet: &wallet::Model, now: DateTime<Utc>, thresholds: &PolicySettings) -> Evaluation {
    let anchor = anchor_for(wallet);
    let elapsed_days = match anchor {
        Anchor::LastRecharge(at) | Anchor::CreatedAt(at) => elapsed_days(at, now),
        Anchor::Missing => 0,
    };

    Evaluation {
        verdict: classify(elapsed_days, wallet.balance, thresholds),
        elapsed_days,
        anchor,
    }
}

/// Whether the wallet currently allows its owner to share catalogs.
///
/// Requires a positive balance and a wallet that has not yet reached its expiry age.
#[must_use]
pub fn is_in_good_standing(
    wallet: &wallet::Model,
    now: DateTime<Utc>,
    thresholds: &PolicySettings,
) -> bool {
    wallet.balance > 0.0 && evaluate(wallet, now, thresholds).verdict != Verdict::Expire
}
