use serde::Serialize;

/// One `<a>` element as seen by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorRecord {
    pub href: Option<String>,
    /// Text nodes joined with spaces, whitespace-collapsed and trimmed.
    pub text: String,
    pub title_attr: Option<String>,
    pub aria_label: Option<String>,
}

/// A discovered recipe link. `url` is always normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub title: String,
    pub url: String,
}

impl Recipe {
    /// Identity used for deduplication.
    pub fn key(&self) -> String {
        self.url.to_lowercase()
    }
}

/// A source page that contributed nothing because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub url: String,
    pub error: String,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Deduplicated candidates across all sources, first-seen order.
    pub recipes: Vec<Recipe>,
    /// The weekly pick drawn from `recipes`.
    pub selected: Vec<Recipe>,
    pub week_label: String,
    pub failures: Vec<SourceFailure>,
}
