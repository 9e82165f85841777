use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::entry::{RankedPage, RawSeries};

#[derive(Debug, Error)]
pub enum ProviderRepositoryError {
    #[error("request to provider failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Read-only access to the remote metadata provider. Implementations map a
/// non-success HTTP status and transport failures alike into `Network` and
/// perform no retries; retry policy belongs to the caller.
#[async_trait]
pub trait ProviderRepository {
    /// Single-result title lookup. Zero matches is `Ok(None)`, not an error.
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Option<RawSeries>, ProviderRepositoryError>;

    /// One page of the provider-ranked catalogue.
    async fn ranked_page(&self, page: i64) -> Result<RankedPage, ProviderRepositoryError>;

    /// Free-text search, up to `limit` records.
    async fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RawSeries>, ProviderRepositoryError>;
}
