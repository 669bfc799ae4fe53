//! In-memory LRU embedding cache keyed by the exact input text.
//!
//! The provider is consulted only on a miss and never while the cache lock is
//! held. Failed computations are not cached.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use docqa_core::traits::Embedder;
use docqa_core::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct EmbeddingCache {
    provider: Arc<dyn Embedder>,
    entries: Mutex<LruCache<String, Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(provider: Arc<dyn Embedder>, capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidConfig("embedding cache capacity must be > 0".into()))?;
        Ok(Self {
            provider,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn get_embedding(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(v) = self.entries.lock().get(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(v.clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let started = std::time::Instant::now();
        let vector = self.provider.embed(text).map_err(|e| {
            tracing::warn!(error = %e, "embedding provider failed");
            Error::embedding(&e)
        })?;
        let elapsed = started.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::warn!(ms = elapsed.as_millis() as u64, chars = text.len(), "slow embedding");
        }
        // A concurrent miss on the same text may have inserted first; `put`
        // replaces in place and keeps the entry count unchanged.
        self.entries.lock().put(text.to_string(), vector.clone());
        Ok(vector)
    }

    pub fn get_embeddings<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.get_embedding(t.as_ref())).collect()
    }

    /// Membership check that does not refresh recency.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.lock().contains(text)
    }

    pub fn len(&self) -> usize { self.entries.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.entries.lock().cap().get() }

    pub fn stats(&self) -> CacheStats {
        CacheStats { hits: self.hits.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed) }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        tracing::debug!("embedding cache cleared");
    }
}

impl Embedder for EmbeddingCache {
    fn dim(&self) -> usize { self.provider.dim() }

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(self.get_embedding(text)?)
    }
}
