use anyhow::Result;
use cronbox_config::{ChannelConfig, JobDetails, JobSpec};
use cronbox_notify::{LogNotifier, Notifier, WebhookNotifier};
use cronbox_recipes::{HttpFetcher, RecipesJob};
use std::sync::Arc;

pub fn build_job(spec: &JobSpec) -> Result<RecipesJob> {
    match &spec.details {
        JobDetails::Recipes { config } => {
            let fetcher = Arc::new(HttpFetcher::new(&config.user_agent)?);
            let notifier = build_notifier(&config.delivery.channel)?;
            tracing::debug!(job = %spec.id, channel = notifier.channel(), "job.built");
            Ok(RecipesJob::new(config.clone(), fetcher, notifier))
        }
    }
}

pub fn build_notifier(channel: &ChannelConfig) -> Result<Arc<dyn Notifier>> {
    match channel {
        ChannelConfig::Webhook {
            endpoint,
            auth_token,
        } => {
            let notifier = WebhookNotifier::new(endpoint.clone(), auth_token.clone())?;
            Ok(Arc::new(notifier))
        }
        ChannelConfig::Log => Ok(Arc::new(LogNotifier)),
    }
}
