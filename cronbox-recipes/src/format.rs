use crate::types::Recipe;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Human-readable label for the week containing `instant`, e.g. `Week of Oct 14, 2026`.
pub fn week_label<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format("Week of %b %d, %Y").to_string()
}

/// Renders digests for delivery.
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    heading: String,
    sources: Vec<String>,
}

impl DigestFormatter {
    pub fn new(heading: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            sources,
        }
    }

    /// ```
    /// use cronbox_recipes::format::DigestFormatter;
    /// use cronbox_recipes::Recipe;
    ///
    /// let formatter = DigestFormatter::new(
    ///     "Weekly vegan recipe picks",
    ///     vec!["https://www.noracooks.com/category/meal-type/dinner/".into()],
    /// );
    /// let body = formatter.render(
    ///     &[Recipe { title: "Vegan Chili".into(), url: "https://www.noracooks.com/vegan-chili".into() }],
    ///     "Week of Oct 14, 2026",
    /// );
    /// assert_eq!(
    ///     body,
    ///     "Weekly vegan recipe picks (Week of Oct 14, 2026)\n\
    ///      \n\
    ///      1. Vegan Chili\n   https://www.noracooks.com/vegan-chili\n\
    ///      \n\
    ///      Sources:\n\
    ///      - https://www.noracooks.com/category/meal-type/dinner/"
    /// );
    /// ```
    pub fn render(&self, recipes: &[Recipe], week_label: &str) -> String {
        let mut lines = vec![format!("{} ({})", self.heading, week_label), String::new()];

        for (idx, recipe) in recipes.iter().enumerate() {
            lines.push(format!("{}. {}", idx + 1, recipe.title));
            lines.push(format!("   {}", recipe.url));
            lines.push(String::new());
        }

        lines.push("Sources:".to_string());
        lines.extend(self.source_lines());
        lines.join("\n")
    }

    /// Body sent when every source came back empty.
    pub fn render_empty(&self) -> String {
        let mut body = String::from(
            "No recipes were found this week. Please check the source pages or parser rules.\n\nSources:\n",
        );
        for line in self.source_lines() {
            body.push_str(&line);
            body.push('\n');
        }
        body
    }

    fn source_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.sources.iter().map(|url| format!("- {url}"))
    }
}
