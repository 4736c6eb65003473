use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::services::ContactUpdate;
use crate::modules::notifications::{NotificationPreferences, UserContact};

/// Channel switches; omitted flags keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFlagsDto {
    pub sms: Option<bool>,
    pub email: Option<bool>,
    pub push: Option<bool>,
}

/// Request DTO for updating notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationSettingsDto {
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone must be 7-15 digits with an optional leading '+'"
    ))]
    pub phone: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 4096, message = "Device token must be 1-4096 characters"))]
    pub device_token: Option<String>,

    #[serde(default)]
    pub notifications: NotificationFlagsDto,
}

impl From<UpdateNotificationSettingsDto> for ContactUpdate {
    fn from(dto: UpdateNotificationSettingsDto) -> Self {
        Self {
            phone: dto.phone,
            email: dto.email,
            device_token: dto.device_token,
            sms: dto.notifications.sms,
            email_enabled: dto.notifications.email,
            push: dto.notifications.push,
        }
    }
}

/// Response DTO for a user's notification settings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsResponseDto {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub has_device_token: bool,
    pub notifications: NotificationPreferences,
}

impl From<UserContact> for NotificationSettingsResponseDto {
    fn from(contact: UserContact) -> Self {
        Self {
            user_id: contact.user_id,
            phone: contact.phone,
            email: contact.email,
            has_device_token: contact.device_token.is_some(),
            notifications: contact.preferences,
        }
    }
}
