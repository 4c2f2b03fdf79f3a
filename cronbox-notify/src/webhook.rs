use crate::{Notification, Notifier};
use async_trait::async_trait;
use cronbox_common::{CronboxError, Result};
use cronbox_http::{Auth, HttpClient, RequestOpts};

/// Posts each notification as a JSON document:
/// `{"sender": .., "recipient": .., "subject": .., "body": ..}`.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: HttpClient,
    endpoint: String,
    auth_token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>, auth_token: Option<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let http = HttpClient::new(&endpoint)
            .map_err(|e| CronboxError::Config(format!("webhook endpoint: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let opts = RequestOpts {
            auth: self.auth_token.as_deref().map(Auth::Bearer),
            ..Default::default()
        };

        match self
            .http
            .post_json_no_content(&self.endpoint, notification, opts)
            .await
        {
            Ok(status) => {
                tracing::info!(
                    target: "notify.webhook",
                    %status,
                    subject = %notification.subject,
                    "notification.sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "notify.webhook", error = %e, "notification.failed");
                Err(CronboxError::Delivery(e.to_string()))
            }
        }
    }

    fn channel(&self) -> &str {
        "webhook"
    }
}
