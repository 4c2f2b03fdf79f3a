use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use cronbox_common::{CronboxError, Result};
use cronbox_config::RecipesConfig;
use cronbox_notify::{Notification, Notifier};
use serde::Serialize;

use crate::classify::RecipeClassifier;
use crate::format::DigestFormatter;
use crate::pipeline::{PageFetcher, RecipePipeline};
use crate::types::RunReport;

pub const MISSING_CONFIG: &str = "Missing config";
pub const DELIVERY_FAILED: &str = "Failed to deliver notification";

/// What a job run reports back to its scheduler.
///
/// ```
/// use cronbox_recipes::JobOutcome;
///
/// let ok = serde_json::to_string(&JobOutcome::success(3)).unwrap();
/// assert_eq!(ok, r#"{"status":"success","recipe_count":3}"#);
/// let err = serde_json::to_string(&JobOutcome::error("Missing config")).unwrap();
/// assert_eq!(err, r#"{"status":"error","message":"Missing config"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    Success { recipe_count: usize },
    Error { message: String },
}

impl JobOutcome {
    pub fn success(recipe_count: usize) -> Self {
        Self::Success { recipe_count }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Subject and body ready for delivery, plus the run that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub subject: String,
    pub body: String,
    pub report: RunReport,
}

/// Offset from whole hours east of UTC.
pub fn reference_offset(utc_offset_hours: i32) -> Result<FixedOffset> {
    utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            CronboxError::Config(format!("utc offset out of range: {utc_offset_hours}h"))
        })
}

/// "Now" as seen in the configured offset.
pub fn reference_now(utc_offset_hours: i32) -> Result<DateTime<FixedOffset>> {
    Ok(Utc::now().with_timezone(&reference_offset(utc_offset_hours)?))
}

/// The weekly recipe digest: fetch the sources, pick this week's recipes and
/// hand the digest to a notifier.
pub struct RecipesJob {
    config: RecipesConfig,
    pipeline: RecipePipeline,
    formatter: DigestFormatter,
    notifier: Arc<dyn Notifier>,
}

impl RecipesJob {
    pub fn new(
        config: RecipesConfig,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let pipeline = RecipePipeline::new(
            fetcher,
            RecipeClassifier::from_config(&config),
            config.count,
        )
        .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_secs));
        let formatter = DigestFormatter::new(config.heading.clone(), config.sources.clone());
        Self {
            config,
            pipeline,
            formatter,
            notifier,
        }
    }

    pub fn config(&self) -> &RecipesConfig {
        &self.config
    }

    pub fn reference_now(&self) -> Result<DateTime<FixedOffset>> {
        reference_now(self.config.utc_offset_hours)
    }

    /// Run the pipeline and render the digest without delivering it.
    pub async fn preview(&self, now: &DateTime<FixedOffset>) -> Digest {
        let report = self.pipeline.run(&self.config.sources, now).await;

        let (subject, body) = if report.recipes.is_empty() {
            (
                format!("{} - {} - No recipes found", self.config.subject, report.week_label),
                self.formatter.render_empty(),
            )
        } else {
            (
                format!("{} - {}", self.config.subject, report.week_label),
                self.formatter.render(&report.selected, &report.week_label),
            )
        };

        Digest {
            subject,
            body,
            report,
        }
    }

    pub async fn run(&self, now: &DateTime<FixedOffset>) -> JobOutcome {
        let delivery = &self.config.delivery;
        let missing = delivery.missing_fields();
        if !missing.is_empty() {
            tracing::error!(?missing, "recipes.job.missing_config");
            return JobOutcome::error(MISSING_CONFIG);
        }

        let digest = self.preview(now).await;
        let recipe_count = digest.report.recipes.len();
        let notification = Notification::new(
            &delivery.sender,
            &delivery.recipient,
            digest.subject,
            digest.body,
        );

        tracing::info!(
            channel = self.notifier.channel(),
            subject = %notification.subject,
            recipe_count,
            "recipes.job.delivering"
        );
        match self.notifier.deliver(&notification).await {
            Ok(()) => JobOutcome::success(recipe_count),
            Err(err) => {
                tracing::error!(channel = self.notifier.channel(), error = %err, "recipes.job.delivery_failed");
                JobOutcome::error(DELIVERY_FAILED)
            }
        }
    }
}
