use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::core::config::NotificationConfig;
use crate::core::error::AppError;
use crate::modules::notifications::contacts::ContactDirectory;
use crate::modules::notifications::event::{
    DeliveryChannel, DeliveryOutcome, NotificationEvent, NotificationPayload,
};
use crate::modules::notifications::senders::ChannelSender;
use crate::modules::notifications::templates::MessageTemplates;

/// Sends a notification event to a user.
///
/// Returns one outcome per channel attempted. An `Err` means nothing could
/// be attempted at all (unknown user, template failure).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        user_id: &str,
        event: NotificationEvent,
        payload: &NotificationPayload,
    ) -> Result<Vec<DeliveryOutcome>, AppError>;
}

/// Notifier that fans out to every channel the user enabled and has an
/// address for. Channel sends run concurrently and all of them settle.
pub struct PreferenceNotifier {
    contacts: Arc<dyn ContactDirectory>,
    sender: Arc<dyn ChannelSender>,
    templates: MessageTemplates,
    default_country_code: String,
}

impl PreferenceNotifier {
    pub fn new(
        contacts: Arc<dyn ContactDirectory>,
        sender: Arc<dyn ChannelSender>,
        config: &NotificationConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            contacts,
            sender,
            templates: MessageTemplates::new(config.app_name.clone())?,
            default_country_code: config.sms_default_country_code.clone(),
        })
    }

    fn format_phone(&self, phone: &str) -> String {
        let phone = phone.trim();
        if phone.starts_with('+') {
            phone.to_string()
        } else {
            format!("{}{}", self.default_country_code, phone)
        }
    }
}

#[async_trait]
impl Notifier for PreferenceNotifier {
    async fn send(
        &self,
        user_id: &str,
        event: NotificationEvent,
        payload: &NotificationPayload,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        let contact = self
            .contacts
            .find_contact(user_id)
            .await
            .map_err(|e| AppError::Dependency(format!("Contact lookup failed: {}", e)))?
            .ok_or_else(|| {
                AppError::Dependency(format!("No contact details for user {}", user_id))
            })?;

        let message = self.templates.render(event, payload)?;
        let message = &message;
        let sender = &self.sender;

        let mut deliveries: Vec<BoxFuture<'_, DeliveryOutcome>> = Vec::new();

        if contact.preferences.sms {
            if let Some(phone) = contact.phone.as_deref().filter(|p| !p.trim().is_empty()) {
                let to = self.format_phone(phone);
                deliveries.push(
                    async move {
                        let result = sender.send_sms(&to, &message.sms).await;
                        settle(DeliveryChannel::Sms, to, result)
                    }
                    .boxed(),
                );
            }
        }

        if contact.preferences.email {
            if let Some(address) = contact.email.clone().filter(|a| !a.trim().is_empty()) {
                deliveries.push(
                    async move {
                        let result = sender
                            .send_email(&address, &message.email_subject, &message.email_body)
                            .await;
                        settle(DeliveryChannel::Email, address, result)
                    }
                    .boxed(),
                );
            }
        }

        if contact.preferences.push {
            if let Some(token) = contact.device_token.clone().filter(|t| !t.trim().is_empty()) {
                deliveries.push(
                    async move {
                        let result = sender
                            .send_push(&token, &message.push_title, &message.push_body, payload)
                            .await;
                        settle(DeliveryChannel::Push, token, result)
                    }
                    .boxed(),
                );
            }
        }

        let outcomes = join_all(deliveries).await;

        tracing::info!(
            "Notifications sent to user {} ({}): {}",
            user_id,
            event,
            outcomes.len()
        );
        Ok(outcomes)
    }
}

fn settle(
    channel: DeliveryChannel,
    recipient: String,
    result: Result<String, AppError>,
) -> DeliveryOutcome {
    match result {
        Ok(message_id) => DeliveryOutcome {
            channel,
            recipient,
            message_id: Some(message_id),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to send {} to {}: {:?}", channel, recipient, e);
            DeliveryOutcome {
                channel,
                recipient,
                message_id: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::notifications::contacts::{NotificationPreferences, UserContact};
    use crate::modules::notifications::senders::LogSender;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StaticContacts(HashMap<String, UserContact>);

    #[async_trait]
    impl ContactDirectory for StaticContacts {
        async fn find_contact(&self, user_id: &str) -> Result<Option<UserContact>, AppError> {
            Ok(self.0.get(user_id).cloned())
        }
    }

    /// Records every send; SMS always fails
    #[derive(Default)]
    struct FlakySender {
        sent: Mutex<Vec<(DeliveryChannel, String, String)>>,
    }

    #[async_trait]
    impl ChannelSender for FlakySender {
        async fn send_sms(&self, phone: &str, body: &str) -> Result<String, AppError> {
            self.sent.lock().unwrap().push((
                DeliveryChannel::Sms,
                phone.to_string(),
                body.to_string(),
            ));
            Err(AppError::Dependency("sms gateway down".to_string()))
        }

        async fn send_email(
            &self,
            address: &str,
            subject: &str,
            _body: &str,
        ) -> Result<String, AppError> {
            self.sent.lock().unwrap().push((
                DeliveryChannel::Email,
                address.to_string(),
                subject.to_string(),
            ));
            Ok("email-1".to_string())
        }

        async fn send_push(
            &self,
            device_token: &str,
            title: &str,
            _body: &str,
            _data: &NotificationPayload,
        ) -> Result<String, AppError> {
            self.sent.lock().unwrap().push((
                DeliveryChannel::Push,
                device_token.to_string(),
                title.to_string(),
            ));
            Ok("push-1".to_string())
        }
    }

    fn contact(user_id: &str, preferences: NotificationPreferences) -> UserContact {
        UserContact {
            user_id: user_id.to_string(),
            phone: Some("9876543210".to_string()),
            email: Some("citizen@example.com".to_string()),
            device_token: None,
            preferences,
        }
    }

    fn notifier(
        contacts: Vec<UserContact>,
        sender: Arc<dyn ChannelSender>,
    ) -> PreferenceNotifier {
        let contacts = contacts
            .into_iter()
            .map(|c| (c.user_id.clone(), c))
            .collect();
        PreferenceNotifier::new(
            Arc::new(StaticContacts(contacts)),
            sender,
            &NotificationConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_settles_every_enabled_channel() {
        let sender = Arc::new(FlakySender::default());
        let notifier = notifier(
            vec![contact("citizen-1", NotificationPreferences::default())],
            sender.clone(),
        );

        let payload = NotificationPayload::for_report(Uuid::now_v7()).with_fine(500);
        let outcomes = notifier
            .send("citizen-1", NotificationEvent::ReportVerified, &payload)
            .await
            .unwrap();

        // No device token, so push is skipped
        assert_eq!(outcomes.len(), 2);
        let sms = outcomes
            .iter()
            .find(|o| o.channel == DeliveryChannel::Sms)
            .unwrap();
        assert!(!sms.is_delivered());
        assert_eq!(sms.recipient, "+919876543210");

        let email = outcomes
            .iter()
            .find(|o| o.channel == DeliveryChannel::Email)
            .unwrap();
        assert!(email.is_delivered());
        assert_eq!(email.message_id.as_deref(), Some("email-1"));

        let sent = sender.sent.lock().unwrap();
        assert!(sent
            .iter()
            .any(|(channel, _, text)| *channel == DeliveryChannel::Email
                && text == "CACHE - Report Verified"));
    }

    #[tokio::test]
    async fn test_send_respects_preferences() {
        let sender = Arc::new(FlakySender::default());
        let mut user = contact(
            "citizen-1",
            NotificationPreferences {
                sms: false,
                email: false,
                push: true,
            },
        );
        user.device_token = Some("device-abc".to_string());
        let notifier = notifier(vec![user], sender.clone());

        let outcomes = notifier
            .send(
                "citizen-1",
                NotificationEvent::RewardCredited,
                &NotificationPayload::default().with_reward(50),
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].channel, DeliveryChannel::Push);
        assert_eq!(outcomes[0].recipient, "device-abc");
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_keeps_international_numbers() {
        let mut user = contact("citizen-1", NotificationPreferences::default());
        user.phone = Some("+14155550100".to_string());
        user.email = None;
        let notifier = notifier(vec![user], Arc::new(LogSender::new("CACHE")));

        let outcomes = notifier
            .send(
                "citizen-1",
                NotificationEvent::Generic,
                &NotificationPayload::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].recipient, "+14155550100");
        assert_eq!(outcomes[0].message_id.as_deref(), Some("mock-sms-id"));
    }

    #[tokio::test]
    async fn test_send_to_unknown_user_is_dependency_error() {
        let notifier = notifier(vec![], Arc::new(LogSender::new("CACHE")));

        let result = notifier
            .send(
                "ghost",
                NotificationEvent::Generic,
                &NotificationPayload::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Dependency(_))));
    }
}
