use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Channels a user has opted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub sms: bool,
    pub email: bool,
    pub push: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            sms: true,
            email: true,
            push: true,
        }
    }
}

/// Where and how a user can be reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserContact {
    pub user_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub device_token: Option<String>,
    pub preferences: NotificationPreferences,
}

/// Lookup of contact details by user id
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn find_contact(&self, user_id: &str) -> Result<Option<UserContact>, AppError>;
}
