use cronbox_config::{
    DEFAULT_ALLOWED_HOSTS, DEFAULT_EXCLUDED_FRAGMENTS, DEFAULT_EXCLUDED_PREFIXES, RecipesConfig,
};
use std::collections::HashSet;
use url::Url;

/// Decides whether a normalized URL points at a recipe page rather than
/// site navigation, taxonomy, or legal pages.
#[derive(Debug, Clone)]
pub struct RecipeClassifier {
    allowed_hosts: HashSet<String>,
    excluded_prefixes: HashSet<String>,
    excluded_fragments: Vec<String>,
}

impl Default for RecipeClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_HOSTS.iter().copied(),
            DEFAULT_EXCLUDED_PREFIXES.iter().copied(),
            DEFAULT_EXCLUDED_FRAGMENTS.iter().copied(),
        )
    }
}

impl RecipeClassifier {
    pub fn new<H, P, F>(allowed_hosts: H, excluded_prefixes: P, excluded_fragments: F) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let lower = |s: &str| s.trim().to_lowercase();
        Self {
            allowed_hosts: allowed_hosts.into_iter().map(|h| lower(h.as_ref())).collect(),
            excluded_prefixes: excluded_prefixes
                .into_iter()
                .map(|p| lower(p.as_ref()))
                .collect(),
            excluded_fragments: excluded_fragments
                .into_iter()
                .map(|f| lower(f.as_ref()))
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &RecipesConfig) -> Self {
        Self::new(
            &config.allowed_hosts,
            &config.excluded_prefixes,
            &config.excluded_fragments,
        )
    }

    /// ```
    /// use cronbox_recipes::classify::RecipeClassifier;
    ///
    /// let classifier = RecipeClassifier::default();
    /// assert!(classifier.is_recipe_url("https://www.noracooks.com/vegan-chili"));
    /// assert!(!classifier.is_recipe_url("https://www.noracooks.com/category/soups"));
    /// assert!(!classifier.is_recipe_url("https://www.noracooks.com/privacy-policy"));
    /// ```
    pub fn is_recipe_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        self.accepts(&parsed)
    }

    pub fn accepts(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        if !self.allowed_hosts.contains(&host.to_lowercase()) {
            return false;
        }

        let path = url.path().trim_matches('/');
        let Some(first) = path.split('/').find(|segment| !segment.is_empty()) else {
            return false;
        };
        if self.excluded_prefixes.contains(&first.to_lowercase()) {
            return false;
        }

        let path = path.to_lowercase();
        !self
            .excluded_fragments
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }
}
