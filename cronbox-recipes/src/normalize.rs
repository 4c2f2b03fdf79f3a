//! URL normalisation for discovered links.
//!
//! Resolves an `href` against the page it was found on, then drops the query
//! string and fragment and trims trailing slashes (the bare root `/` stays).
//! The result is a fixed point: normalising a normalised URL returns it
//! unchanged.

use url::Url;

/// Resolve and normalise `href` against `base`.
///
/// Returns `None` when the href is absent, blank, or cannot be resolved.
///
/// # Examples
///
/// ```
/// use cronbox_recipes::normalize::normalize_href;
/// use url::Url;
///
/// let base = Url::parse("https://www.noracooks.com/category/meal-type/dinner/").unwrap();
/// assert_eq!(
///     normalize_href(Some("/recipes/vegan-chili/?utm_source=x#comments"), &base).as_deref(),
///     Some("https://www.noracooks.com/recipes/vegan-chili")
/// );
/// assert_eq!(normalize_href(None, &base), None);
/// ```
pub fn normalize_href(href: Option<&str>, base: &Url) -> Option<String> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = base.join(href).ok()?;
    Some(strip_url(resolved))
}

/// Normalise an absolute URL string. Unparseable input yields `None`.
pub fn normalize_absolute(raw: &str) -> Option<String> {
    Url::parse(raw).ok().map(strip_url)
}

fn strip_url(mut url: Url) -> String {
    url.set_query(None);
    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    url.to_string()
}
