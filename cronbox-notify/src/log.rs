use crate::{Notification, Notifier};
use async_trait::async_trait;
use cronbox_common::Result;

/// Writes notifications to the `notify.log` tracing target instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            target: "notify.log",
            sender = %notification.sender,
            recipient = %notification.recipient,
            subject = %notification.subject,
            body_len = notification.body.len(),
            "notification.logged"
        );
        tracing::debug!(target: "notify.log", body = %notification.body, "notification.body");
        Ok(())
    }

    fn channel(&self) -> &str {
        "log"
    }
}
