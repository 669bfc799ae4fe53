use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;
use docqa_core::Error;
use docqa_embed::{embedder_from_config, EmbeddingCache, HashingEmbedder};

/// Wraps the hashing embedder and counts provider calls.
struct CountingEmbedder {
    inner: HashingEmbedder,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    fn new(dim: usize) -> Self { Self { inner: HashingEmbedder::new(dim), calls: AtomicUsize::new(0) } }
    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize { self.inner.dim() }
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text)
    }
}

/// Fails on texts containing "boom", succeeds otherwise.
struct FlakyEmbedder;

impl Embedder for FlakyEmbedder {
    fn dim(&self) -> usize { 4 }
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        if text.contains("boom") { anyhow::bail!("backend unavailable") }
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }
}

#[test]
fn hashing_embedder_shapes_and_determinism() {
    let embedder = HashingEmbedder::new(1024);
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 1024, "embedding dim is 1024");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn hashing_embedder_without_tokens_is_zero_vector() {
    let v = HashingEmbedder::new(8).embed("  ...  ").unwrap();
    assert_eq!(v, vec![0.0; 8]);
}

#[test]
fn repeated_text_is_served_from_cache_bit_identical() {
    let provider = Arc::new(CountingEmbedder::new(32));
    let cache = EmbeddingCache::new(provider.clone(), 10).unwrap();

    let first = cache.get_embedding("solar panels").unwrap();
    let second = cache.get_embedding("solar panels").unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(
        first.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
    );

    cache.get_embedding("Solar panels").unwrap();
    assert_eq!(provider.calls(), 2, "distinct strings get distinct slots");
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn eviction_drops_exactly_the_least_recently_used() {
    let provider = Arc::new(CountingEmbedder::new(16));
    let cache = EmbeddingCache::new(provider.clone(), 1000).unwrap();

    for i in 0..1000 { cache.get_embedding(&format!("text {i}")).unwrap(); }
    // touch "text 0" so "text 1" becomes the oldest
    cache.get_embedding("text 0").unwrap();
    cache.get_embedding("text 1000").unwrap();

    assert_eq!(cache.len(), 1000);
    assert!(!cache.contains("text 1"));
    let survivors: HashSet<usize> = (0..=1000).filter(|i| cache.contains(&format!("text {i}"))).collect();
    assert_eq!(survivors.len(), 1000);

    let before = provider.calls();
    cache.get_embedding("text 0").unwrap();
    assert_eq!(provider.calls(), before, "recent entry still cached");
    cache.get_embedding("text 1").unwrap();
    assert_eq!(provider.calls(), before + 1, "evicted entry is recomputed");
}

#[test]
fn provider_failure_propagates_and_is_not_cached() {
    let cache = EmbeddingCache::new(Arc::new(FlakyEmbedder), 4).unwrap();
    let err = cache.get_embedding("boom").unwrap_err();
    assert!(matches!(err, Error::Embedding(ref msg) if msg.contains("backend unavailable")));
    assert!(cache.is_empty());
    assert!(cache.get_embedding("fine").is_ok());
    assert_eq!(cache.len(), 1);
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(matches!(EmbeddingCache::new(Arc::new(FlakyEmbedder), 0), Err(Error::InvalidConfig(_))));
}

#[test]
fn clear_forgets_entries() {
    let provider = Arc::new(CountingEmbedder::new(8));
    let cache = EmbeddingCache::new(provider.clone(), 4).unwrap();
    cache.get_embedding("a").unwrap();
    cache.clear();
    cache.get_embedding("a").unwrap();
    assert_eq!(provider.calls(), 2);
}

#[test]
fn factory_builds_hashing_and_rejects_unknown() {
    let cfg = EmbeddingConfig { dimension: 48, ..EmbeddingConfig::default() };
    let e = embedder_from_config(&cfg).unwrap();
    assert_eq!(e.dim(), 48);
    assert_eq!(e.embed("x").unwrap().len(), 48);

    let unknown = EmbeddingConfig { provider: "telepathy".into(), ..EmbeddingConfig::default() };
    assert!(matches!(embedder_from_config(&unknown), Err(Error::InvalidConfig(_))));
    let zero = EmbeddingConfig { dimension: 0, ..EmbeddingConfig::default() };
    assert!(embedder_from_config(&zero).is_err());
}
