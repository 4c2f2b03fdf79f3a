use crate::extract::collapse_whitespace;
use crate::types::AnchorRecord;

pub const MIN_TITLE_CHARS: usize = 4;
pub const MAX_TITLE_CHARS: usize = 120;

type Candidate = fn(&AnchorRecord) -> Option<&str>;

fn visible_text(anchor: &AnchorRecord) -> Option<&str> {
    Some(anchor.text.as_str())
}

fn aria_label(anchor: &AnchorRecord) -> Option<&str> {
    anchor.aria_label.as_deref()
}

fn title_attr(anchor: &AnchorRecord) -> Option<&str> {
    anchor.title_attr.as_deref()
}

/// Evaluated in order; the first acceptable one wins.
const CANDIDATES: &[Candidate] = &[visible_text, aria_label, title_attr];

fn acceptable(cleaned: &str) -> bool {
    (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&cleaned.chars().count())
}

/// Pick the best human-readable title for an anchor.
///
/// ```
/// use cronbox_recipes::title::pick_title;
/// use cronbox_recipes::AnchorRecord;
///
/// let anchor = AnchorRecord {
///     text: "  ".into(),
///     title_attr: Some("Best Tacos Ever".into()),
///     ..Default::default()
/// };
/// assert_eq!(pick_title(&anchor).as_deref(), Some("Best Tacos Ever"));
/// ```
pub fn pick_title(anchor: &AnchorRecord) -> Option<String> {
    CANDIDATES
        .iter()
        .filter_map(|candidate| candidate(anchor))
        .map(collapse_whitespace)
        .find(|cleaned| acceptable(cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(text: &str, aria: Option<&str>, title: Option<&str>) -> AnchorRecord {
        AnchorRecord {
            href: Some("/x".into()),
            text: text.into(),
            aria_label: aria.map(Into::into),
            title_attr: title.map(Into::into),
        }
    }

    #[test]
    fn visible_text_wins_when_acceptable() {
        let a = anchor("Vegan Chili", Some("Aria Chili"), Some("Title Chili"));
        assert_eq!(pick_title(&a).as_deref(), Some("Vegan Chili"));
    }

    #[test]
    fn falls_back_to_aria_label_before_title() {
        let a = anchor("Go", Some("  Cozy   Lentil Soup "), Some("Title Soup"));
        assert_eq!(pick_title(&a).as_deref(), Some("Cozy Lentil Soup"));
    }

    #[test]
    fn falls_back_to_title_attribute() {
        let a = anchor("  ", None, Some("Best Tacos Ever"));
        assert_eq!(pick_title(&a).as_deref(), Some("Best Tacos Ever"));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert_eq!(pick_title(&anchor("Tofu", None, None)).as_deref(), Some("Tofu"));
        assert_eq!(pick_title(&anchor("Pho", None, None)), None);

        let max = "a".repeat(MAX_TITLE_CHARS);
        assert_eq!(pick_title(&anchor(&max, None, None)), Some(max.clone()));
        let too_long = "a".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(pick_title(&anchor(&too_long, None, None)), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Five characters, seven bytes.
        assert_eq!(pick_title(&anchor("Crêpé", None, None)).as_deref(), Some("Crêpé"));
        assert_eq!(pick_title(&anchor("ñño", None, None)), None);
    }

    #[test]
    fn nothing_acceptable_yields_none() {
        assert_eq!(pick_title(&anchor("", Some("ok"), Some(" "))), None);
    }
}
