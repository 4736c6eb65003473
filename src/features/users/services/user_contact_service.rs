use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::modules::notifications::{ContactDirectory, NotificationPreferences, UserContact};

/// Partial update of a user's contact details.
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub device_token: Option<String>,
    pub sms: Option<bool>,
    pub email_enabled: Option<bool>,
    pub push: Option<bool>,
}

/// In-memory contact book; the Notifier reads it through `ContactDirectory`
#[derive(Default)]
pub struct UserContactService {
    contacts: RwLock<HashMap<String, UserContact>>,
}

impl UserContactService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: &str) -> Result<UserContact> {
        self.contacts
            .read()
            .map_err(|_| AppError::Internal("contact book lock poisoned".to_string()))?
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} has no contact details", user_id)))
    }

    /// Create or update a user's contact details; new users start with every
    /// channel enabled
    pub async fn upsert(&self, user_id: &str, update: ContactUpdate) -> Result<UserContact> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::validation("userId", "User id is required"));
        }

        let mut contacts = self
            .contacts
            .write()
            .map_err(|_| AppError::Internal("contact book lock poisoned".to_string()))?;

        let contact = contacts
            .entry(user_id.to_string())
            .or_insert_with(|| UserContact {
                user_id: user_id.to_string(),
                phone: None,
                email: None,
                device_token: None,
                preferences: NotificationPreferences::default(),
            });

        if let Some(phone) = update.phone {
            contact.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
        }
        if let Some(email) = update.email {
            contact.email = Some(email.trim().to_lowercase()).filter(|e| !e.is_empty());
        }
        if let Some(token) = update.device_token {
            contact.device_token = Some(token).filter(|t| !t.trim().is_empty());
        }
        if let Some(sms) = update.sms {
            contact.preferences.sms = sms;
        }
        if let Some(email_enabled) = update.email_enabled {
            contact.preferences.email = email_enabled;
        }
        if let Some(push) = update.push {
            contact.preferences.push = push;
        }

        tracing::info!(
            "Updated notification settings for user {}: sms={} email={} push={}",
            user_id,
            contact.preferences.sms,
            contact.preferences.email,
            contact.preferences.push
        );

        Ok(contact.clone())
    }
}

#[async_trait]
impl ContactDirectory for UserContactService {
    async fn find_contact(&self, user_id: &str) -> Result<Option<UserContact>> {
        Ok(self
            .contacts
            .read()
            .map_err(|_| AppError::Internal("contact book lock poisoned".to_string()))?
            .get(user_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_upsert_creates_with_all_channels_enabled() {
        let service = UserContactService::new();

        let contact = assert_ok!(
            service
                .upsert(
                    "citizen-1",
                    ContactUpdate {
                        phone: Some(" 9876543210 ".to_string()),
                        email: Some("Citizen@Example.com".to_string()),
                        ..Default::default()
                    },
                )
                .await
        );

        assert_eq!(contact.phone.as_deref(), Some("9876543210"));
        assert_eq!(contact.email.as_deref(), Some("citizen@example.com"));
        assert_eq!(contact.preferences, NotificationPreferences::default());
    }

    #[tokio::test]
    async fn test_upsert_keeps_unspecified_fields() {
        let service = UserContactService::new();
        service
            .upsert(
                "citizen-1",
                ContactUpdate {
                    phone: Some("9876543210".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let contact = service
            .upsert(
                "citizen-1",
                ContactUpdate {
                    sms: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(contact.phone.as_deref(), Some("9876543210"));
        assert!(!contact.preferences.sms);
        assert!(contact.preferences.email);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let service = UserContactService::new();
        let err = assert_err!(service.get("ghost").await);
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.find_contact("ghost").await.unwrap().is_none());
    }
}
