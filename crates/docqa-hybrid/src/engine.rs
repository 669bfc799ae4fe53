use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use docqa_core::config::{FusionIdentity, RetrievalConfig};
use docqa_core::traits::{Clock, Embedder};
use docqa_core::types::{DocId, Document, Meta, SearchResult};
use docqa_core::Result;
use docqa_embed::EmbeddingCache;
use docqa_text::LexicalIndex;
use docqa_vector::{distance_to_similarity, FlatL2Index};

use crate::fusion::reciprocal_rank_fusion;
use crate::result_cache::ResultCache;

struct StoredDocument {
    id: DocId,
    content: Arc<str>,
    metadata: Arc<Meta>,
}

/// Position `i` of `documents`, `vectors` and `lexical` is the same document.
#[derive(Default)]
struct Corpus {
    documents: Vec<StoredDocument>,
    vectors: FlatL2Index,
    lexical: LexicalIndex,
}

impl Corpus {
    fn result(&self, position: usize, score: f32) -> SearchResult {
        let d = &self.documents[position];
        SearchResult { doc_id: d.id, content: Arc::clone(&d.content), score, metadata: Arc::clone(&d.metadata) }
    }

    /// `(position, similarity)` of the `k` nearest documents.
    fn semantic(&self, embeddings: &EmbeddingCache, query: &str, k: usize) -> Result<Vec<(usize, f32)>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(vec![]);
        }
        let q = embeddings.get_embedding(query)?;
        let hits = self.vectors.search(&q, k)?;
        Ok(hits.into_iter().map(|(d, row)| (row, distance_to_similarity(d))).collect())
    }
}

/// Semantic + lexical retrieval fused with RRF, with per-query result caching.
pub struct HybridSearcher {
    embeddings: EmbeddingCache,
    corpus: RwLock<Corpus>,
    results: ResultCache,
    rrf_k: f32,
    identity: FusionIdentity,
}

impl HybridSearcher {
    pub fn new(config: &RetrievalConfig, embedder: Arc<dyn Embedder>, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            embeddings: EmbeddingCache::new(embedder, config.embedding_cache_capacity)?,
            corpus: RwLock::new(Corpus::default()),
            results: ResultCache::new(config.result_cache_capacity, config.result_cache_ttl_secs, clock)?,
            rrf_k: config.rrf_k,
            identity: config.fusion_identity,
        })
    }

    /// Index a batch. Embeddings are computed first; the three structures are
    /// then appended under one write lock, or left untouched on error.
    pub fn add_documents(&self, documents: Vec<Document>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        let contents: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let vectors = self.embeddings.get_embeddings(&contents)?;

        let mut corpus = self.corpus.write();
        corpus.vectors.add(&vectors)?;
        corpus.lexical.add(&contents);
        let added = documents.len();
        corpus.documents.extend(documents.into_iter().map(|d| StoredDocument {
            id: d.id,
            content: Arc::from(d.content),
            metadata: Arc::new(d.metadata),
        }));
        self.results.clear();
        tracing::info!(added, total = corpus.documents.len(), "documents indexed");
        Ok(added)
    }

    pub fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let corpus = self.corpus.read();
        let hits = corpus.semantic(&self.embeddings, query, k)?;
        Ok(hits.into_iter().map(|(p, s)| corpus.result(p, s)).collect())
    }

    pub fn lexical_search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        let corpus = self.corpus.read();
        corpus.lexical.search(query, k).into_iter().map(|h| corpus.result(h.position, h.score)).collect()
    }

    pub fn hybrid_search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(vec![]);
        }
        // Held through the cache insert so an add cannot slip in between
        // computing and caching.
        let corpus = self.corpus.read();
        if let Some(cached) = self.results.get(query, k) {
            tracing::debug!(query, k, "result cache hit");
            return Ok(cached);
        }
        let semantic = corpus.semantic(&self.embeddings, query, k)?;
        let lexical = corpus.lexical.search(query, k);
        tracing::debug!(query, k, semantic = semantic.len(), lexical = lexical.len(), "fusing rankings");

        let fused: Vec<SearchResult> = match self.identity {
            FusionIdentity::Document => {
                let lists = [
                    semantic.iter().map(|&(p, _)| p).collect::<Vec<_>>(),
                    lexical.iter().map(|h| h.position).collect::<Vec<_>>(),
                ];
                reciprocal_rank_fusion(&lists, self.rrf_k, k)
                    .into_iter()
                    .map(|(p, score)| corpus.result(p, score))
                    .collect()
            }
            FusionIdentity::Content => {
                // Representative document per text: last in the semantic
                // ranking, otherwise first in the lexical one.
                let mut representative: HashMap<Arc<str>, usize> = HashMap::new();
                for &(p, _) in &semantic {
                    representative.insert(Arc::clone(&corpus.documents[p].content), p);
                }
                for h in &lexical {
                    representative.entry(Arc::clone(&corpus.documents[h.position].content)).or_insert(h.position);
                }
                let content_of = |p: usize| Arc::clone(&corpus.documents[p].content);
                let lists = [
                    semantic.iter().map(|&(p, _)| content_of(p)).collect::<Vec<_>>(),
                    lexical.iter().map(|h| content_of(h.position)).collect::<Vec<_>>(),
                ];
                reciprocal_rank_fusion(&lists, self.rrf_k, k)
                    .into_iter()
                    .filter_map(|(content, score)| representative.get(&content).map(|&p| corpus.result(p, score)))
                    .collect()
            }
        };

        self.results.insert(query, k, fused.clone());
        Ok(fused)
    }

    /// Forget cached results and cached embeddings; the index is kept.
    pub fn clear_cache(&self) {
        self.results.clear();
        self.embeddings.clear();
    }

    /// Drop every document, index row and cache entry.
    pub fn clear(&self) {
        let mut corpus = self.corpus.write();
        corpus.documents.clear();
        corpus.vectors.clear();
        corpus.lexical.clear();
        self.clear_cache();
        tracing::info!("corpus cleared");
    }

    pub fn len(&self) -> usize { self.corpus.read().documents.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn embedding_cache(&self) -> &EmbeddingCache { &self.embeddings }

    pub fn result_cache(&self) -> &ResultCache { &self.results }
}
