use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{
    entities::entry::{RankedPage, RawSeries},
    repositories::provider::{ProviderRepository, ProviderRepositoryError},
};

const RANKED_PAGE_SIZE: i64 = 10;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub large_image_url: String,
    pub image_url: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Images {
    pub jpg: ImageSet,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Published {
    pub from: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Manga {
    pub mal_id: i64,
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub images: Images,
    pub status: Option<String>,
    pub score: Option<f64>,
    pub chapters: Option<i64>,
    pub published: Published,
    pub authors: Vec<Named>,
    pub genres: Vec<Named>,
}

impl From<Manga> for RawSeries {
    fn from(m: Manga) -> Self {
        Self {
            id: m.mal_id,
            title: m.title,
            synopsis: m.synopsis,
            cover_large: non_empty(m.images.jpg.large_image_url),
            cover: non_empty(m.images.jpg.image_url),
            status: m.status,
            score: m.score,
            chapters: m.chapters,
            published_from: m.published.from,
            authors: m.authors.into_iter().map(|a| a.name).collect(),
            genres: m.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Vec<Manga>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Pagination {
    has_next_page: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TopResponse {
    data: Vec<Manga>,
    pagination: Pagination,
}

/// Jikan-backed provider. Every request carries an explicit timeout; no
/// retries here, pacing and fallback belong to the service.
#[derive(Debug, Clone)]
pub struct ProviderRepositoryImpl {
    base_url: String,
    client: reqwest::Client,
}

impl ProviderRepositoryImpl {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderRepositoryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hondana/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ProviderRepository for ProviderRepositoryImpl {
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Option<RawSeries>, ProviderRepositoryError> {
        let res: SearchResponse = self
            .client
            .get(format!("{}/manga", self.base_url))
            .query(&[("q", title), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(res.data.into_iter().next().map(Into::into))
    }

    async fn ranked_page(&self, page: i64) -> Result<RankedPage, ProviderRepositoryError> {
        let res: TopResponse = self
            .client
            .get(format!("{}/top/manga", self.base_url))
            .query(&[
                ("page", page.to_string()),
                ("limit", RANKED_PAGE_SIZE.to_string()),
                ("filter", "bypopularity".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(RankedPage {
            records: res.data.into_iter().map(Into::into).collect(),
            has_next_page: res.pagination.has_next_page,
        })
    }

    async fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RawSeries>, ProviderRepositoryError> {
        let res: SearchResponse = self
            .client
            .get(format!("{}/manga", self.base_url))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(res.data.into_iter().map(Into::into).collect())
    }
}
