//! Message templates for every notification event.
//!
//! Each event has five Jinja templates, one per message part, registered
//! under `<event>/<part>`. Rendering context is the notification payload
//! plus `app_name`.

use std::collections::HashMap;

use minijinja::{Environment, Value};

use crate::core::error::AppError;
use crate::modules::notifications::event::{NotificationEvent, NotificationPayload};

const TEMPLATES: &[(&str, &str)] = &[
    (
        "verification/sms",
        "Your {{ app_name }} verification code is: {{ token }}. Valid for 10 minutes.",
    ),
    ("verification/email_subject", "{{ app_name }} - Phone Verification"),
    ("verification/email_body", "Your verification code is: {{ token }}"),
    ("verification/push_title", "Verification Code"),
    ("verification/push_body", "Your verification code has been sent"),
    (
        "report_submitted/sms",
        "Your violation report #{{ report_id }} has been submitted successfully.",
    ),
    ("report_submitted/email_subject", "{{ app_name }} - Report Submitted"),
    (
        "report_submitted/email_body",
        "Your violation report has been submitted and is under review.",
    ),
    ("report_submitted/push_title", "Report Submitted"),
    ("report_submitted/push_body", "Your violation report is under review"),
    (
        "report_verified/sms",
        "Great! Your report #{{ report_id }} has been verified. Challan issued for ₹{{ fine_amount }}.",
    ),
    ("report_verified/email_subject", "{{ app_name }} - Report Verified"),
    (
        "report_verified/email_body",
        "Your report has been verified and a challan has been issued.\
         {% if reward_amount %} You will receive a reward of ₹{{ reward_amount }}.{% endif %}",
    ),
    ("report_verified/push_title", "Report Verified"),
    ("report_verified/push_body", "Challan issued for ₹{{ fine_amount }}"),
    (
        "reward_credited/sms",
        "Congratulations! ₹{{ reward_amount }} reward has been credited to your account.",
    ),
    ("reward_credited/email_subject", "{{ app_name }} - Reward Credited"),
    (
        "reward_credited/email_body",
        "Your reward of ₹{{ reward_amount }} has been credited to your account.",
    ),
    ("reward_credited/push_title", "Reward Credited"),
    ("reward_credited/push_body", "₹{{ reward_amount }} credited to your account"),
    (
        "generic/sms",
        "{% if message %}{{ message }}{% else %}You have a new notification from {{ app_name }}{% endif %}",
    ),
    (
        "generic/email_subject",
        "{% if subject %}{{ subject }}{% else %}{{ app_name }} Notification{% endif %}",
    ),
    (
        "generic/email_body",
        "{% if message %}{{ message }}{% else %}You have a new notification{% endif %}",
    ),
    (
        "generic/push_title",
        "{% if title %}{{ title }}{% else %}{{ app_name }}{% endif %}",
    ),
    (
        "generic/push_body",
        "{% if message %}{{ message }}{% else %}New notification{% endif %}",
    ),
];

/// The text of one notification on every channel
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub sms: String,
    pub email_subject: String,
    pub email_body: String,
    pub push_title: String,
    pub push_body: String,
}

pub struct MessageTemplates {
    env: Environment<'static>,
    app_name: String,
}

impl MessageTemplates {
    pub fn new(app_name: impl Into<String>) -> Result<Self, AppError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source).map_err(|e| {
                AppError::Internal(format!("Failed to load template {}: {}", name, e))
            })?;
        }

        Ok(Self {
            env,
            app_name: app_name.into(),
        })
    }

    pub fn render(
        &self,
        event: NotificationEvent,
        payload: &NotificationPayload,
    ) -> Result<RenderedMessage, AppError> {
        let ctx = self.context(payload);

        Ok(RenderedMessage {
            sms: self.render_part(event, "sms", &ctx)?,
            email_subject: self.render_part(event, "email_subject", &ctx)?,
            email_body: self.render_part(event, "email_body", &ctx)?,
            push_title: self.render_part(event, "push_title", &ctx)?,
            push_body: self.render_part(event, "push_body", &ctx)?,
        })
    }

    fn render_part(
        &self,
        event: NotificationEvent,
        part: &str,
        ctx: &HashMap<&'static str, Value>,
    ) -> Result<String, AppError> {
        let name = format!("{}/{}", event.as_str(), part);
        self.env
            .get_template(&name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| AppError::Internal(format!("Failed to render template {}: {}", name, e)))
    }

    fn context(&self, payload: &NotificationPayload) -> HashMap<&'static str, Value> {
        let mut ctx = HashMap::new();
        ctx.insert("app_name", Value::from(self.app_name.clone()));
        if let Some(report_id) = payload.report_id {
            ctx.insert("report_id", Value::from(report_id.to_string()));
        }
        if let Some(fine_amount) = payload.fine_amount {
            ctx.insert("fine_amount", Value::from(fine_amount));
        }
        if let Some(reward_amount) = payload.reward_amount {
            ctx.insert("reward_amount", Value::from(reward_amount));
        }
        if let Some(token) = &payload.token {
            ctx.insert("token", Value::from(token.clone()));
        }
        if let Some(message) = &payload.message {
            ctx.insert("message", Value::from(message.clone()));
        }
        if let Some(subject) = &payload.subject {
            ctx.insert("subject", Value::from(subject.clone()));
        }
        if let Some(title) = &payload.title {
            ctx.insert("title", Value::from(title.clone()));
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn templates() -> MessageTemplates {
        MessageTemplates::new("CACHE").unwrap()
    }

    #[test]
    fn test_every_event_renders() {
        let payload = NotificationPayload::for_report(Uuid::nil())
            .with_fine(500)
            .with_reward(50);

        for event in [
            NotificationEvent::Verification,
            NotificationEvent::ReportSubmitted,
            NotificationEvent::ReportVerified,
            NotificationEvent::RewardCredited,
            NotificationEvent::Generic,
        ] {
            let rendered = templates().render(event, &payload).unwrap();
            assert!(!rendered.sms.is_empty(), "{} sms is empty", event);
            assert!(!rendered.email_subject.is_empty(), "{} subject is empty", event);
        }
    }

    #[test]
    fn test_report_verified_mentions_fine() {
        let id = Uuid::now_v7();
        let payload = NotificationPayload::for_report(id).with_fine(1_000);

        let rendered = templates()
            .render(NotificationEvent::ReportVerified, &payload)
            .unwrap();

        assert_eq!(
            rendered.sms,
            format!(
                "Great! Your report #{} has been verified. Challan issued for ₹1000.",
                id
            )
        );
        assert_eq!(rendered.push_body, "Challan issued for ₹1000");
        assert_eq!(rendered.email_subject, "CACHE - Report Verified");
    }

    #[test]
    fn test_reward_credited_mentions_amount() {
        let payload = NotificationPayload::default().with_reward(150);

        let rendered = templates()
            .render(NotificationEvent::RewardCredited, &payload)
            .unwrap();

        assert_eq!(
            rendered.sms,
            "Congratulations! ₹150 reward has been credited to your account."
        );
    }

    #[test]
    fn test_generic_uses_payload_text() {
        let payload = NotificationPayload::default()
            .with_message("Your report was rejected")
            .with_title("Report Rejected");

        let rendered = templates()
            .render(NotificationEvent::Generic, &payload)
            .unwrap();

        assert_eq!(rendered.sms, "Your report was rejected");
        assert_eq!(rendered.push_title, "Report Rejected");
        assert_eq!(rendered.email_subject, "CACHE Notification");
    }

    #[test]
    fn test_generic_falls_back_without_payload() {
        let rendered = templates()
            .render(NotificationEvent::Generic, &NotificationPayload::default())
            .unwrap();

        assert_eq!(rendered.sms, "You have a new notification from CACHE");
        assert_eq!(rendered.email_body, "You have a new notification");
        assert_eq!(rendered.push_title, "CACHE");
        assert_eq!(rendered.push_body, "New notification");
    }
}
