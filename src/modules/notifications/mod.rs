//! Notification module
//!
//! Renders per-event messages and delivers them over SMS, e-mail and push
//! according to each user's preferences.

mod contacts;
mod event;
mod notifier;
mod senders;
mod templates;

pub use contacts::{ContactDirectory, NotificationPreferences, UserContact};
pub use event::{DeliveryChannel, DeliveryOutcome, NotificationEvent, NotificationPayload};
pub use notifier::{Notifier, PreferenceNotifier};
pub use senders::{ChannelSender, LogSender};
pub use templates::{MessageTemplates, RenderedMessage};
