use parking_lot::Mutex;
use std::sync::Arc;

use docqa_core::clock::SystemClock;
use docqa_core::config::{RetrievalConfig, Settings};
use docqa_core::traits::{Clock, Embedder};
use docqa_core::types::{DocId, Document, Meta, SearchRecord, ADDED_AT_KEY, DOC_ID_KEY};
use docqa_core::Result;
use docqa_embed::embedder_from_config;

use crate::context::RetrievedContext;
use crate::engine::HybridSearcher;

/// Id-assigning facade over [`HybridSearcher`].
///
/// Ids start at 0, grow by one per document and are never reissued, including
/// after [`DocumentStore::clear`] or a failed batch.
pub struct DocumentStore {
    searcher: HybridSearcher,
    next_id: Mutex<DocId>,
    clock: Arc<dyn Clock>,
    default_k: usize,
}

impl DocumentStore {
    pub fn new(config: &RetrievalConfig, embedder: Arc<dyn Embedder>, clock: Arc<dyn Clock>) -> Result<Self> {
        let searcher = HybridSearcher::new(config, embedder, Arc::clone(&clock))?;
        Ok(Self { searcher, next_id: Mutex::new(0), clock, default_k: config.default_k })
    }

    pub fn from_config(settings: &Settings) -> Result<Self> {
        let embedder = embedder_from_config(&settings.embedding)?;
        Self::new(&settings.retrieval, embedder, Arc::new(SystemClock))
    }

    pub fn add_document(&self, content: impl Into<String>, metadata: Meta) -> Result<DocId> {
        let ids = self.add_documents(vec![(content.into(), metadata)])?;
        Ok(ids.first().copied().unwrap_or_default())
    }

    pub fn add_documents(&self, batch: Vec<(String, Meta)>) -> Result<Vec<DocId>> {
        if batch.is_empty() {
            return Ok(vec![]);
        }
        // Held across the engine add so ids follow indexing order.
        let mut next_id = self.next_id.lock();
        let first = *next_id;
        *next_id += batch.len() as DocId;
        let added_at = self.clock.now().to_rfc3339();

        let documents: Vec<Document> = batch
            .into_iter()
            .zip(first..)
            .map(|((content, mut metadata), id)| {
                metadata.insert(ADDED_AT_KEY.to_string(), serde_json::Value::String(added_at.clone()));
                metadata.insert(DOC_ID_KEY.to_string(), serde_json::Value::from(id));
                Document { id, content, metadata }
            })
            .collect();
        let ids: Vec<DocId> = documents.iter().map(|d| d.id).collect();
        self.searcher.add_documents(documents)?;
        Ok(ids)
    }

    /// Add extracted text tagged with where it came from.
    pub fn add_source_document(
        &self,
        content: impl Into<String>,
        source: &str,
        doc_type: &str,
        extra: Meta,
    ) -> Result<DocId> {
        let mut metadata = extra;
        metadata.insert("source".to_string(), serde_json::Value::from(source));
        metadata.insert("doc_type".to_string(), serde_json::Value::from(doc_type));
        self.add_document(content, metadata)
    }

    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchRecord>> {
        Ok(self.searcher.hybrid_search(query, k)?.into_iter().map(SearchRecord::from).collect())
    }

    pub fn retrieve_context(&self, question: &str, max_context: usize) -> Result<RetrievedContext> {
        let ctx = RetrievedContext::from_records(self.search(question, max_context)?);
        tracing::debug!(passages = ctx.passages.len(), confidence = ctx.confidence, "context retrieved");
        Ok(ctx)
    }

    pub fn clear_cache(&self) { self.searcher.clear_cache(); }

    /// Drop all documents. The id counter keeps counting.
    pub fn clear(&self) { self.searcher.clear(); }

    pub fn len(&self) -> usize { self.searcher.len() }

    pub fn is_empty(&self) -> bool { self.searcher.is_empty() }

    pub fn default_k(&self) -> usize { self.default_k }

    pub fn searcher(&self) -> &HybridSearcher { &self.searcher }
}
