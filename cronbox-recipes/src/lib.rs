//! Weekly recipe discovery.
//!
//! Scans recipe-listing pages, keeps the links that look like individual
//! recipes, and picks a handful that stays stable for an ISO week.
//!
//! # Pipeline
//!
//! - [`extract`]: markup to [`AnchorRecord`]s
//! - [`normalize`]: resolve, drop query/fragment, trim trailing slashes
//! - [`classify`]: host, path-prefix and path-fragment rules
//! - [`title`]: first acceptable of text, `aria-label`, `title`
//! - [`dedup`]: first occurrence of each URL wins
//! - [`weekly`]: week-seeded sample
//! - [`format`]: plain-text digest
//!
//! [`pipeline::RecipePipeline`] strings these together over fetched source
//! pages and [`RecipesJob`] wraps it with delivery.
//!
//! # Examples
//!
//! ```
//! use cronbox_recipes::classify::RecipeClassifier;
//! use cronbox_recipes::pipeline::extract_recipes;
//! use cronbox_recipes::Recipe;
//!
//! let html = r#"<a href="/recipes/vegan-chili/">Vegan Chili</a>"#;
//! let found = extract_recipes(
//!     html,
//!     "https://www.noracooks.com/category/meal-type/dinner/",
//!     &RecipeClassifier::default(),
//! )?;
//! assert_eq!(
//!     found,
//!     vec![Recipe {
//!         title: "Vegan Chili".into(),
//!         url: "https://www.noracooks.com/recipes/vegan-chili".into(),
//!     }]
//! );
//! # Ok::<(), cronbox_common::CronboxError>(())
//! ```

pub mod classify;
pub mod dedup;
pub mod extract;
pub mod format;
pub mod job;
pub mod normalize;
pub mod pipeline;
pub mod title;
mod types;
pub mod weekly;

pub use job::{Digest, JobOutcome, RecipesJob, reference_now, reference_offset};
pub use pipeline::{HttpFetcher, PageFetcher, RecipePipeline};
pub use types::{AnchorRecord, Recipe, RunReport, SourceFailure};
