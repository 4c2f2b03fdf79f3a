#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use cronbox_common::observability::{LogConfig, init_logging};
use cronbox_common::{CronboxError, Result};
use cronbox_config::{ChannelConfig, DeliveryConfig, RecipesConfig};
use cronbox_notify::{Notification, Notifier};
use cronbox_recipes::PageFetcher;

/// Route pipeline events through the shared subscriber once per test binary.
pub fn init_tracing() {
    let _ = init_logging(LogConfig {
        default_filter: "warn".into(),
        ..Default::default()
    });
}

pub const DINNER: &str = "https://www.noracooks.com/category/meal-type/dinner/";
pub const LUNCH: &str = "https://www.noracooks.com/category/meal-type/lunch/";

/// Serves canned pages; any other URL fails like an unreachable host.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| CronboxError::fetch(url, "connection refused"))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub reject: bool,
}

impl RecordingNotifier {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        if self.reject {
            return Err(CronboxError::Delivery("relay returned 500".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel(&self) -> &str {
        "recording"
    }
}

pub fn recipes_config(sources: &[&str]) -> RecipesConfig {
    RecipesConfig {
        sources: sources.iter().map(|s| s.to_string()).collect(),
        delivery: DeliveryConfig {
            recipient: "cook@example.com".into(),
            sender: "bot@example.com".into(),
            channel: ChannelConfig::Log,
        },
        ..Default::default()
    }
}

/// Wednesday, ISO week 42 of 2026, 09:00 at UTC-5.
pub fn wednesday() -> DateTime<FixedOffset> {
    est(2026, 10, 14, 9)
}

pub fn est(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap()
}

/// A listing page with one anchor per slug, titled from the slug.
pub fn listing(slugs: &[&str]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            let title = slug.replace('-', " ");
            format!(r#"<li><a href="/{slug}/">{title}</a></li>"#)
        })
        .collect();
    format!(
        r#"<html><body><nav><a href="/category/soups/">Soups</a><a href="/about/">About</a></nav><ul>{items}</ul></body></html>"#
    )
}
