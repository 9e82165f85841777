use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{
        entities::{cache::CacheRecord, entry::Entry},
        repositories::cache::{CacheRepository, CacheRepositoryError},
    },
    infrastructure::clock::Clock,
};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File-backed cache store, one JSON file per key. Anything that cannot be
/// read back cleanly is treated as a cold cache. Writes go through a
/// uniquely named temp file renamed into place, so concurrent writers to
/// the same key cannot interleave bytes; the last rename wins whole.
#[derive(Debug, Clone)]
pub struct CacheRepositoryImpl<K> {
    path: PathBuf,
    clock: K,
}

impl<K> CacheRepositoryImpl<K>
where
    K: Clock,
{
    pub fn new<P: AsRef<Path>>(path: P, clock: K) -> Self {
        Self {
            path: PathBuf::new().join(path),
            clock,
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.path.join(format!("{key}.json"))
    }
}

#[async_trait]
impl<K> CacheRepository for CacheRepositoryImpl<K>
where
    K: Clock,
{
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, CacheRepositoryError> {
        let path = self.record_path(key);

        let encoded = match tokio::fs::read(&path).await {
            Ok(encoded) => encoded,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!("failed to read cache record {key:?}: {e}");
                return Ok(None);
            }
        };

        match serde_json::from_slice(&encoded) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("corrupt cache record {key:?}, treating as cold: {e}");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, payload: &[Entry]) -> Result<(), CacheRepositoryError> {
        tokio::fs::create_dir_all(&self.path).await?;

        let record = CacheRecord {
            payload: payload.to_vec(),
            timestamp: self.clock.now_millis(),
        };
        let encoded = serde_json::to_vec(&record)?;

        let tmp = self.path.join(format!(
            "{key}.json.{}.{}.tmp",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed),
        ));
        tokio::fs::write(&tmp, &encoded).await?;
        tokio::fs::rename(&tmp, self.record_path(key)).await?;

        Ok(())
    }

    fn is_fresh(&self, record: &CacheRecord, ttl: Duration) -> bool {
        record.is_fresh(self.clock.now_millis(), ttl)
    }
}
