//! Source pages in, weekly pick out.
//!
//! [`RecipePipeline::run`] walks the configured sources one at a time. Each
//! page goes through extraction, normalisation, classification and title
//! selection; a source that fails to fetch or parse is logged, recorded in
//! [`RunReport::failures`] and contributes nothing. Survivors are
//! deduplicated across sources and the weekly selector draws the pick.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use cronbox_common::{CronboxError, Result};
use cronbox_http::{HttpClient, RequestOpts};
use url::Url;

use crate::classify::RecipeClassifier;
use crate::dedup::dedupe_recipes;
use crate::extract::LinkExtractor;
use crate::format::week_label;
use crate::normalize::normalize_href;
use crate::title::pick_title;
use crate::types::{Recipe, RunReport, SourceFailure};
use crate::weekly::pick_weekly;

/// Retrieves the markup of one page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// [`PageFetcher`] backed by [`HttpClient`]. Single attempt per page.
#[derive(Clone)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = HttpClient::unanchored()
            .and_then(|client| client.with_user_agent(user_agent))
            .map_err(|e| CronboxError::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let opts = RequestOpts {
            timeout: Some(timeout),
            retries: Some(0),
            ..Default::default()
        };
        self.client
            .get_text(url, opts)
            .await
            .map_err(|e| CronboxError::fetch(url, e))
    }
}

/// Turn one page of markup into recipe candidates, in document order.
///
/// Fails only when `base_url` itself is not a valid absolute URL.
///
/// ```
/// use cronbox_recipes::classify::RecipeClassifier;
/// use cronbox_recipes::pipeline::extract_recipes;
///
/// let html = r#"<a href="/recipes/vegan-chili/">Vegan Chili</a>
///               <a href="/category/soups/">Soups</a>"#;
/// let found = extract_recipes(
///     html,
///     "https://www.noracooks.com/category/meal-type/dinner/",
///     &RecipeClassifier::default(),
/// )?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].url, "https://www.noracooks.com/recipes/vegan-chili");
/// # Ok::<(), cronbox_common::CronboxError>(())
/// ```
pub fn extract_recipes(
    markup: &str,
    base_url: &str,
    classifier: &RecipeClassifier,
) -> Result<Vec<Recipe>> {
    let base = Url::parse(base_url).map_err(|e| CronboxError::parse(base_url, e))?;
    let extractor = LinkExtractor::parse(markup);

    let recipes = extractor
        .anchors()
        .filter_map(|anchor| {
            let url = normalize_href(anchor.href.as_deref(), &base)?;
            if !classifier.is_recipe_url(&url) {
                return None;
            }
            let title = pick_title(&anchor)?;
            Some(Recipe { title, url })
        })
        .collect();
    Ok(recipes)
}

pub struct RecipePipeline {
    fetcher: Arc<dyn PageFetcher>,
    classifier: RecipeClassifier,
    count: usize,
    fetch_timeout: Duration,
}

impl RecipePipeline {
    /// A `count` of 0 is raised to 1.
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: RecipeClassifier, count: usize) -> Self {
        Self {
            fetcher,
            classifier,
            count: count.max(1),
            fetch_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub async fn run(&self, sources: &[String], now: &DateTime<FixedOffset>) -> RunReport {
        let mut found = Vec::new();
        let mut failures = Vec::new();

        for source in sources {
            match self.collect(source).await {
                Ok(recipes) => {
                    tracing::info!(source = %source, found = recipes.len(), "recipes.source.parsed");
                    found.extend(recipes);
                }
                Err(err) => {
                    tracing::warn!(source = %source, error = %err, "recipes.source.failed");
                    failures.push(SourceFailure {
                        url: source.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let recipes = dedupe_recipes(found);
        let selected = pick_weekly(recipes.clone(), self.count, now);
        tracing::info!(
            candidates = recipes.len(),
            selected = selected.len(),
            failed_sources = failures.len(),
            "recipes.pipeline.done"
        );

        RunReport {
            recipes,
            selected,
            week_label: week_label(now),
            failures,
        }
    }

    async fn collect(&self, source: &str) -> Result<Vec<Recipe>> {
        let markup = self.fetcher.fetch(source, self.fetch_timeout).await?;
        extract_recipes(&markup, source, &self.classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DINNER: &str = "https://www.noracooks.com/category/meal-type/dinner/";

    /// Serves the same markup for every URL.
    struct SamePage(&'static str);

    #[async_trait]
    impl PageFetcher for SamePage {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn wednesday() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 14, 9, 0, 0)
            .single()
            .unwrap()
    }

    fn pipeline(markup: &'static str, count: usize) -> RecipePipeline {
        RecipePipeline::new(
            Arc::new(SamePage(markup)),
            RecipeClassifier::default(),
            count,
        )
    }

    #[test]
    fn relative_links_resolve_against_the_source_page() {
        let html = r##"<ul>
            <li><a href="../../../vegan-lasagna/">Vegan Lasagna</a></li>
            <li><a href="https://www.noracooks.com/lentil-soup?utm=1">Lentil Soup</a></li>
            <li><a href="https://www.pinterest.com/noracooks/">Pinterest</a></li>
            <li><a href="#main">Skip to content</a></li>
        </ul>"##;
        let found = extract_recipes(html, DINNER, &RecipeClassifier::default()).unwrap();
        let urls: Vec<_> = found.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.noracooks.com/vegan-lasagna",
                "https://www.noracooks.com/lentil-soup",
            ]
        );
    }

    #[test]
    fn anchors_without_a_usable_title_are_dropped() {
        let html = r#"<a href="/vegan-chili/"><img src="chili.jpg"></a>
                      <a href="/vegan-chili/">Vegan Chili</a>"#;
        let found = extract_recipes(html, DINNER, &RecipeClassifier::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Vegan Chili");
    }

    #[test]
    fn invalid_base_is_a_parse_error() {
        let err = extract_recipes("<a href='/x'>Dish</a>", "not a url", &RecipeClassifier::default())
            .unwrap_err();
        assert!(matches!(err, CronboxError::Parse { .. }));
        assert!(err.is_per_source());
    }

    #[tokio::test]
    async fn unparseable_source_is_skipped_and_later_sources_still_count() {
        let sources = vec!["not a url".to_string(), DINNER.to_string()];
        let report = pipeline(r#"<a href="/vegan-chili/">Vegan Chili</a>"#, 5)
            .run(&sources, &wednesday())
            .await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "not a url");
        assert!(report.failures[0].error.starts_with("Parse error for not a url"));
        assert_eq!(
            report.recipes,
            vec![Recipe {
                title: "Vegan Chili".into(),
                url: "https://www.noracooks.com/vegan-chili".into(),
            }]
        );
    }

    #[tokio::test]
    async fn zero_count_still_picks_from_a_non_empty_list() {
        let html = r#"<a href="/vegan-chili/">Vegan Chili</a>
                      <a href="/lentil-soup/">Lentil Soup</a>"#;
        let report = pipeline(html, 0).run(&[DINNER.to_string()], &wednesday()).await;
        assert_eq!(report.recipes.len(), 2);
        assert_eq!(report.selected.len(), 1);
        assert!(report.recipes.contains(&report.selected[0]));
    }
}
