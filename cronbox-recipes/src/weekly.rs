//! Deterministic weekly selection.
//!
//! The seed string is `"<iso_year>-W<iso_week>"`. Its BLAKE3 digest seeds a
//! `ChaCha8Rng`, and `rand::seq::index::sample` draws the indices. Every run
//! inside one ISO week therefore picks the same items, and the pick rotates
//! when the week changes.

use chrono::Datelike;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// ISO year + week a reference instant falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekSeed {
    pub year: i32,
    pub week: u32,
}

impl WeekSeed {
    pub fn of<D: Datelike>(instant: &D) -> Self {
        let iso = instant.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    fn rng(&self) -> ChaCha8Rng {
        let digest = blake3::hash(self.to_string().as_bytes());
        ChaCha8Rng::from_seed(*digest.as_bytes())
    }
}

impl fmt::Display for WeekSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

/// Sample `count` items for the week that `instant` falls in.
///
/// Lists no longer than `count` come back untouched, in their original order.
/// A `count` of 0 is treated as 1.
///
/// ```
/// use chrono::NaiveDate;
/// use cronbox_recipes::weekly::pick_weekly;
///
/// let items: Vec<u32> = (0..20).collect();
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
/// let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
///
/// let a = pick_weekly(items.clone(), 5, &monday);
/// assert_eq!(a.len(), 5);
/// assert_eq!(a, pick_weekly(items, 5, &sunday));
/// ```
pub fn pick_weekly<T, D>(items: Vec<T>, count: usize, instant: &D) -> Vec<T>
where
    D: Datelike,
{
    let count = count.max(1);
    if items.len() <= count {
        return items;
    }

    let seed = WeekSeed::of(instant);
    let mut rng = seed.rng();
    let picks = rand::seq::index::sample(&mut rng, items.len(), count);
    tracing::debug!(%seed, available = items.len(), count, "recipes.weekly.sample");

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picks
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
