use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{cache::CacheRecord, entry::Entry};

pub const CURATED_KEY: &str = "curated";
pub const RANKED_KEY: &str = "ranked";

#[derive(Debug, Error)]
pub enum CacheRepositoryError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted key-to-record store. A corrupt or unreadable record is a
/// cold cache: `get` answers `Ok(None)` for it, never an error.
#[async_trait]
pub trait CacheRepository {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, CacheRepositoryError>;

    /// Overwrites whatever was stored under `key`, stamping current time.
    async fn set(&self, key: &str, payload: &[Entry]) -> Result<(), CacheRepositoryError>;

    fn is_fresh(&self, record: &CacheRecord, ttl: Duration) -> bool;
}
