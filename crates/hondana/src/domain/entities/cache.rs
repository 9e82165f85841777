use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::entry::Entry;

/// A persisted list snapshot. Records are replaced whole on every write,
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub payload: Vec<Entry>,
    /// Epoch milliseconds at write time.
    pub timestamp: i64,
}

impl CacheRecord {
    /// A record is fresh while `now - timestamp < ttl`; at exactly the TTL
    /// it is stale.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        now_millis - self.timestamp < ttl.as_millis() as i64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_freshness_boundary() {
        let record = CacheRecord {
            payload: vec![],
            timestamp: 1_000_000,
        };
        let ttl = Duration::from_secs(3600);

        assert!(record.is_fresh(1_000_000, ttl));
        assert!(record.is_fresh(1_000_000 + 3_599_999, ttl));
        assert!(!record.is_fresh(1_000_000 + 3_600_000, ttl));
        assert!(!record.is_fresh(1_000_000 + 3_600_001, ttl));
    }
}
