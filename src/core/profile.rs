//! Owner profiles - name, phone, business and country kept per account.
//!
//! A profile is written at first sign-in with whatever the owner gave at sign-up and
//! edited later from settings, so saving is an upsert.

use crate::{
    core::ordering,
    entities::{Profile, profile},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, SqlErr, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Profile fields to save; `None` leaves a field unchanged (or empty on creation)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileChanges {
    /// Owner's name
    pub name: Option<String>,
    /// Owner's phone number
    pub phone: Option<String>,
    /// Business name
    pub business: Option<String>,
    /// Country of business
    pub country: Option<String>,
    /// Contact email; an empty string clears it
    pub email: Option<String>,
}

fn invalid(message: &str) -> Error {
    Error::InvalidInput {
        message: message.to_string(),
    }
}

struct ValidChanges {
    name: Option<String>,
    phone: Option<String>,
    business: Option<String>,
    country: Option<String>,
    email: Option<Option<String>>,
}

fn validate(changes: ProfileChanges) -> Result<ValidChanges> {
    let name = changes.name.map(|n| n.trim().to_string());
    if name.as_deref().is_some_and(str::is_empty) {
        return Err(invalid("Name cannot be empty"));
    }

    let phone = changes.phone.map(|p| p.trim().to_string());
    if phone
        .as_deref()
        .is_some_and(|p| !p.is_empty() && ordering::contact_digits(p).is_empty())
    {
        return Err(invalid("Phone must contain digits"));
    }

    let email = changes.email.map(|e| {
        let e = e.trim().to_string();
        (!e.is_empty()).then_some(e)
    });
    if matches!(&email, Some(Some(address)) if !address.contains('@')) {
        return Err(invalid("Email must contain '@'"));
    }

    Ok(ValidChanges {
        name,
        phone,
        business: changes.business.map(|b| b.trim().to_string()),
        country: changes.country.map(|c| c.trim().to_string()),
        email,
    })
}

async fn find_profile(db: &DatabaseConnection, account_id: &str) -> Result<Option<profile::Model>> {
    Profile::find()
        .filter(profile::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn apply(
    db: &DatabaseConnection,
    existing: profile::Model,
    changes: ValidChanges,
    now: DateTime<Utc>,
) -> Result<profile::Model> {
    let mut active: profile::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(phone);
    }
    if let Some(business) = changes.business {
        active.business = Set(business);
    }
    if let Some(country) = changes.country {
        active.country = Set(country);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    active.updated_at = Set(now);
    active.update(db).await.map_err(Into::into)
}

/// Fetches the caller's profile.
///
/// # Errors
/// Returns `Error::ProfileNotFound` if the account has not saved one.
pub async fn get_profile(db: &DatabaseConnection, account_id: &str) -> Result<profile::Model> {
    find_profile(db, account_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            account_id: account_id.to_string(),
        })
}

/// Creates the caller's profile or updates the given fields of an existing one.
///
/// # Errors
/// Returns an error if:
/// - A given name is empty, a phone has no digits, or an email has no `@`
/// - The database write fails
#[instrument(skip(db, changes))]
pub async fn save_profile(
    db: &DatabaseConnection,
    account_id: &str,
    changes: ProfileChanges,
    now: DateTime<Utc>,
) -> Result<profile::Model> {
    let changes = validate(changes)?;

    if let Some(existing) = find_profile(db, account_id).await? {
        return apply(db, existing, changes, now).await;
    }

    let profile = profile::ActiveModel {
        account_id: Set(account_id.to_string()),
        name: Set(changes.name.clone().unwrap_or_default()),
        phone: Set(changes.phone.clone().unwrap_or_default()),
        business: Set(changes.business.clone().unwrap_or_default()),
        country: Set(changes.country.clone().unwrap_or_default()),
        email: Set(changes.email.clone().flatten()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match profile.insert(db).await {
        Ok(created) => {
            info!("Created profile for {}", account_id);
            Ok(created)
        }
        // A concurrent first save won the insert
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let existing = get_profile(db, account_id).await?;
            apply(db, existing, changes, now).await
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn signup() -> ProfileChanges {
        ProfileChanges {
            name: Some(" Asha ".to_string()),
            phone: Some("+91 98765 43210".to_string()),
            business: Some("Asha's Pickles".to_string()),
            country: Some("India".to_string()),
            email: Some("asha@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_save_creates_profile() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_profile(&db, "acct-1").await;
        assert!(matches!(result, Err(Error::ProfileNotFound { .. })));

        let created = save_profile(&db, "acct-1", signup(), Utc::now()).await?;
        assert_eq!(created.name, "Asha");
        assert_eq!(created.country, "India");
        assert_eq!(created.email.as_deref(), Some("asha@example.com"));

        assert_eq!(get_profile(&db, "acct-1").await?, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_later_save_updates_only_given_fields() -> Result<()> {
        let db = setup_test_db().await?;
        save_profile(&db, "acct-1", signup(), Utc::now()).await?;

        let changes = ProfileChanges {
            business: Some("Asha's Pickles & Jams".to_string()),
            email: Some(String::new()),
            ..Default::default()
        };
        let updated = save_profile(&db, "acct-1", changes, Utc::now()).await?;
        assert_eq!(updated.name, "Asha");
        assert_eq!(updated.phone, "+91 98765 43210");
        assert_eq!(updated.business, "Asha's Pickles & Jams");
        assert!(updated.email.is_none());

        let count = Profile::find().count(&db).await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_save_profile_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let blank_name = ProfileChanges {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        let result = save_profile(&db, "acct-1", blank_name, Utc::now()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let bad_phone = ProfileChanges {
            phone: Some("call me".to_string()),
            ..Default::default()
        };
        let result = save_profile(&db, "acct-1", bad_phone, Utc::now()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let bad_email = ProfileChanges {
            email: Some("asha.example.com".to_string()),
            ..Default::default()
        };
        let result = save_profile(&db, "acct-1", bad_email, Utc::now()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        assert!(matches!(
            get_profile(&db, "acct-1").await,
            Err(Error::ProfileNotFound { .. })
        ));

        Ok(())
    }
}
