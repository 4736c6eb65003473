//! Channel transports.
//!
//! `LogSender` is the transport used when no SMS/e-mail/push provider is
//! configured: it logs what would have been sent and returns a mock id.

use async_trait::async_trait;

use crate::core::error::AppError;
use crate::modules::notifications::event::NotificationPayload;

/// Delivery over the three notification channels.
///
/// Each method returns the provider's message id.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, AppError>;

    async fn send_email(&self, address: &str, subject: &str, body: &str)
        -> Result<String, AppError>;

    async fn send_push(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: &NotificationPayload,
    ) -> Result<String, AppError>;
}

pub struct LogSender {
    app_name: String,
}

impl LogSender {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl ChannelSender for LogSender {
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, AppError> {
        tracing::info!("SMS would be sent to {}: {}", phone, body);
        Ok("mock-sms-id".to_string())
    }

    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, AppError> {
        tracing::info!(
            "Email would be sent from {} to {}: {}",
            self.app_name,
            address,
            subject
        );
        tracing::debug!("Email body: {}", body);
        Ok("mock-email-id".to_string())
    }

    async fn send_push(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: &NotificationPayload,
    ) -> Result<String, AppError> {
        tracing::info!(
            "Push notification would be sent to {}: {} - {} ({:?})",
            device_token,
            title,
            body,
            data.report_id
        );
        Ok("mock-push-id".to_string())
    }
}
