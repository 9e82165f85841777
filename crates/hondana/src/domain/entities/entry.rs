use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state as reported by the provider. Anything the provider
/// does not explicitly mark "Finished" counts as ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Ongoing,
    Completed,
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Canonical catalogue item. This is the only shape consumers see, and it
/// doubles as the cache payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cover_url: String,
    pub status: SeriesStatus,
    /// Rounded to one fractional digit, always within [0, 10].
    pub rating: f64,
    /// Always >= 1.
    pub chapter_count: i64,
    pub published_from: Option<DateTime<Utc>>,
    pub authors: String,
    /// Provider order, never re-sorted here.
    pub genres: Vec<String>,
}

/// One provider record in structural form, before normalization. Every
/// field the provider may omit is an `Option` so absence-handling in the
/// normalizer is total.
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    pub id: i64,
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub cover_large: Option<String>,
    pub cover: Option<String>,
    pub status: Option<String>,
    pub score: Option<f64>,
    pub chapters: Option<i64>,
    pub published_from: Option<DateTime<Utc>>,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
}

/// One page of the provider-ranked catalogue.
#[derive(Debug, Clone, Default)]
pub struct RankedPage {
    pub records: Vec<RawSeries>,
    pub has_next_page: bool,
}
