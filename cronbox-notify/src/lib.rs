//! Notification channels for job output.
//!
//! Jobs hand a finished [`Notification`] to a [`Notifier`] and only care
//! whether it was accepted. Concrete channels:
//!
//! - [`WebhookNotifier`]: POSTs the notification as JSON to an endpoint
//!   (mail relays, chat bridges, SMS gateways)
//! - [`LogNotifier`]: writes the notification to the log, for dry runs
//!
//! # Examples
//! ```
//! use cronbox_notify::{LogNotifier, Notification, Notifier};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cronbox_common::Result<()> {
//! let notifier = LogNotifier::default();
//! let note = Notification::new("bot@example.com", "cook@example.com", "Hi", "Body");
//! notifier.deliver(&note).await?;
//! assert_eq!(notifier.channel(), "log");
//! # Ok(())
//! # }
//! ```

mod log;
mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use cronbox_common::Result;
use serde::Serialize;

/// A delivery-ready message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hand the notification to the channel. `Err` means it was not accepted.
    async fn deliver(&self, notification: &Notification) -> Result<()>;

    /// Short channel name for logs.
    fn channel(&self) -> &str;
}
