use std::sync::Mutex;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::domain::entities::entry::{Entry, RawSeries, SeriesStatus};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_DESCRIPTION: &str = "No description available";

/// Converts one raw provider record into a canonical `Entry`. Mapping is
/// deterministic except for two synthesis rules: a missing score draws a
/// rating from [3.0, 5.0) and a missing chapter count draws from [1, 100].
/// The generator is injectable so tests can pin the drawn values.
pub struct Normalizer {
    rng: Mutex<StdRng>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn normalize(&self, raw: RawSeries) -> Entry {
        let rating = match raw.score {
            Some(score) => round_tenths(score.clamp(0.0, 10.0)),
            None => round_tenths(self.draw(|rng| rng.random_range(3.0..5.0))),
        };

        // The provider reports 0 chapters for unfinished serializations;
        // that counts as absent.
        let chapter_count = match raw.chapters.filter(|&c| c >= 1) {
            Some(chapters) => chapters,
            None => self.draw(|rng| rng.random_range(1..=100)),
        };

        let status = match raw.status.as_deref() {
            Some("Finished") => SeriesStatus::Completed,
            _ => SeriesStatus::Ongoing,
        };

        Entry {
            id: raw.id,
            title: non_empty(raw.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: non_empty(raw.synopsis).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            cover_url: non_empty(raw.cover_large)
                .or_else(|| non_empty(raw.cover))
                .unwrap_or_default(),
            status,
            rating,
            chapter_count,
            published_from: raw.published_from,
            authors: raw.authors.join(", "),
            genres: raw.genres,
        }
    }

    fn draw<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
