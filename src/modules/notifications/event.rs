use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of message sent to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    Verification,
    ReportSubmitted,
    ReportVerified,
    RewardCredited,
    Generic,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::Verification => "verification",
            NotificationEvent::ReportSubmitted => "report_submitted",
            NotificationEvent::ReportVerified => "report_verified",
            NotificationEvent::RewardCredited => "reward_credited",
            NotificationEvent::Generic => "generic",
        }
    }
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Values referenced by the message templates.
///
/// Every field is optional; each event reads the ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub report_id: Option<Uuid>,
    pub fine_amount: Option<i64>,
    pub reward_amount: Option<i64>,
    /// One-time code for `verification` messages
    pub token: Option<String>,
    pub message: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
}

impl NotificationPayload {
    pub fn for_report(report_id: Uuid) -> Self {
        Self {
            report_id: Some(report_id),
            ..Default::default()
        }
    }

    pub fn with_fine(mut self, fine_amount: i64) -> Self {
        self.fine_amount = Some(fine_amount);
        self
    }

    pub fn with_reward(mut self, reward_amount: i64) -> Self {
        self.reward_amount = Some(reward_amount);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Sms,
    Email,
    Push,
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryChannel::Sms => write!(f, "sms"),
            DeliveryChannel::Email => write!(f, "email"),
            DeliveryChannel::Push => write!(f, "push"),
        }
    }
}

/// Result of one channel send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub channel: DeliveryChannel,
    pub recipient: String,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}
