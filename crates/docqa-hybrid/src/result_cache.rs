//! Fused results memoized per `(query, k)` with a TTL and an LRU bound.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

use docqa_core::traits::Clock;
use docqa_core::types::SearchResult;
use docqa_core::{Error, Result};

// chrono panics above i64::MAX milliseconds.
const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    k: usize,
}

struct Entry {
    stored_at: DateTime<Utc>,
    results: Vec<SearchResult>,
}

pub struct ResultCache {
    entries: Mutex<LruCache<CacheKey, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl_secs: u64, clock: Arc<dyn Clock>) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidConfig("result cache capacity must be > 0".into()))?;
        if ttl_secs == 0 {
            return Err(Error::InvalidConfig("result cache ttl must be > 0".into()));
        }
        let ttl = Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64);
        Ok(Self { entries: Mutex::new(LruCache::new(capacity)), ttl, clock })
    }

    /// Cached results younger than the TTL. Expired entries are dropped.
    pub fn get(&self, query: &str, k: usize) -> Option<Vec<SearchResult>> {
        let key = CacheKey { query: query.to_string(), k };
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            None => return None,
            Some(entry) if now - entry.stored_at < self.ttl => return Some(entry.results.clone()),
            Some(_) => {}
        }
        entries.pop(&key);
        tracing::debug!(query, k, "result cache entry expired");
        None
    }

    pub fn insert(&self, query: &str, k: usize, results: Vec<SearchResult>) {
        let entry = Entry { stored_at: self.clock.now(), results };
        self.entries.lock().put(CacheKey { query: query.to_string(), k }, entry);
    }

    pub fn len(&self) -> usize { self.entries.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn clear(&self) { self.entries.lock().clear(); }
}
