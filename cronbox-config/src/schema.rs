//! Typed configuration schema for `cronbox.yaml`.

use cronbox_common::observability::LogFormat;
use cronbox_common::{CronboxError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_SOURCES: &[&str] = &[
    "https://www.noracooks.com/category/meal-type/dinner/",
    "https://www.noracooks.com/category/meal-type/lunch/",
];

pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["www.noracooks.com", "noracooks.com"];

pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] =
    &["category", "tag", "page", "wp-content", "wp-json", "author"];

pub const DEFAULT_EXCLUDED_FRAGMENTS: &[&str] = &[
    "privacy",
    "terms",
    "contact",
    "about",
    "disclaimer",
    "shop",
    "store",
    "print",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; CronBot/1.0)";

const RECIPIENT_ENV: &str = "RECIPIENT_EMAIL";
const SENDER_ENV: &str = "SENDER_EMAIL";
const MAX_UTC_OFFSET_HOURS: i32 = 23;

#[derive(Debug, Deserialize)]
pub struct CronboxConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default = "default_jobs")]
    pub jobs: Vec<JobSpec>,
}

impl Default for CronboxConfig {
    fn default() -> Self {
        Self {
            version: None,
            logging: LoggingSettings::default(),
            jobs: default_jobs(),
        }
    }
}

impl CronboxConfig {
    /// Look a job up by id, or take the first enabled one when `id` is `None`.
    pub fn job(&self, id: Option<&str>) -> Option<&JobSpec> {
        match id {
            Some(id) => self.jobs.iter().find(|j| j.id == id),
            None => self.jobs.iter().find(|j| j.is_enabled()),
        }
    }

    /// Structural checks that do not depend on secrets being present.
    pub fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            match &job.details {
                JobDetails::Recipes { config } => config
                    .validate()
                    .map_err(|e| CronboxError::Config(format!("job '{}': {e}", job.id)))?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub stderr: bool,
    #[serde(default)]
    pub file: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            stderr: true,
            file: false,
            dir: None,
            filter: default_filter(),
        }
    }
}

/// Shared fields + the per-kind "details"
#[derive(Debug, Deserialize)]
pub struct JobSpec {
    pub id: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub details: JobDetails,
}

impl JobSpec {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// The tag is `kind`; the payload lives in `config`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum JobDetails {
    #[serde(rename = "recipes")]
    Recipes { config: RecipesConfig },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipesConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
    #[serde(default = "default_excluded_fragments")]
    pub excluded_fragments: Vec<String>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            allowed_hosts: default_allowed_hosts(),
            excluded_prefixes: default_excluded_prefixes(),
            excluded_fragments: default_excluded_fragments(),
            count: default_count(),
            utc_offset_hours: default_utc_offset_hours(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            heading: default_heading(),
            subject: default_subject(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl RecipesConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.sources.is_empty() {
            return Err("at least one source page is required".into());
        }
        for source in &self.sources {
            Url::parse(source).map_err(|e| format!("invalid source url '{source}': {e}"))?;
        }
        if self.allowed_hosts.is_empty() {
            return Err("allowed_hosts must not be empty".into());
        }
        if self.count == 0 {
            return Err("count must be at least 1".into());
        }
        if self.utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS {
            return Err(format!(
                "utc_offset_hours must be within ±{MAX_UTC_OFFSET_HOURS}, got {}",
                self.utc_offset_hours
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be positive".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            sender: default_sender(),
            channel: ChannelConfig::default(),
        }
    }
}

impl DeliveryConfig {
    /// Names of required delivery fields that are blank or still hold an
    /// unexpanded `${VAR}` placeholder.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("recipient", &self.recipient), ("sender", &self.sender)]
            .into_iter()
            .filter(|(_, value)| is_unset(value))
            .map(|(name, _)| name)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChannelConfig {
    Webhook {
        endpoint: String,
        #[serde(default)]
        auth_token: Option<String>,
    },
    #[default]
    Log,
}

fn is_unset(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.contains("${")
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_jobs() -> Vec<JobSpec> {
    vec![JobSpec {
        id: "weekly-recipes".into(),
        enabled: Some(true),
        details: JobDetails::Recipes {
            config: RecipesConfig::default(),
        },
    }]
}
fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "info".into()
}
fn default_sources() -> Vec<String> {
    owned(DEFAULT_SOURCES)
}
fn default_allowed_hosts() -> Vec<String> {
    owned(DEFAULT_ALLOWED_HOSTS)
}
fn default_excluded_prefixes() -> Vec<String> {
    owned(DEFAULT_EXCLUDED_PREFIXES)
}
fn default_excluded_fragments() -> Vec<String> {
    owned(DEFAULT_EXCLUDED_FRAGMENTS)
}
fn default_count() -> usize {
    5
}
fn default_utc_offset_hours() -> i32 {
    -5
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_heading() -> String {
    "Weekly vegan recipe picks".into()
}
fn default_subject() -> String {
    "Weekly Vegan Recipes".into()
}
fn default_recipient() -> String {
    std::env::var(RECIPIENT_ENV).unwrap_or_default()
}
fn default_sender() -> String {
    std::env::var(SENDER_ENV).unwrap_or_default()
}
