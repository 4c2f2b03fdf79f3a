//! Recipe deduplication by normalised URL.
//!
//! Keeps the first occurrence of each URL (compared case-insensitively) and
//! drops later repeats, so the source page order is preserved.

use std::collections::HashSet;

use crate::types::Recipe;

pub fn dedupe_recipes<I>(recipes: I) -> Vec<Recipe>
where
    I: IntoIterator<Item = Recipe>,
{
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| seen.insert(recipe.key()))
        .collect()
}
