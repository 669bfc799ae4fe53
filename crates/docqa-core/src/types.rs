//! Domain types shared by the embedding, vector, text and hybrid crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub type DocId = u64;
pub type Meta = HashMap<String, serde_json::Value>;

/// Metadata key stamped with the RFC 3339 insertion time.
pub const ADDED_AT_KEY: &str = "added_at";
/// Metadata key stamped with the assigned [`DocId`].
pub const DOC_ID_KEY: &str = "doc_id";

/// A document ready to be indexed.
///
/// - `id`: identifier assigned by the document store
/// - `content`: already-extracted plain text
/// - `metadata`: scalar/string values attached by the caller and the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub content: String,
    pub metadata: Meta,
}

/// A ranked hit produced by one of the search modes or by fusion.
///
/// `content` and `metadata` are shared with the stored document, so cloning a
/// result never copies text. `score` depends on the mode: similarity in
/// (0, 1] for semantic search, overlap ratio for lexical, RRF sum for hybrid.
/// Higher is always better.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub content: Arc<str>,
    pub score: f32,
    pub metadata: Arc<Meta>,
}

/// Plain, owned form of [`SearchResult`] handed to orchestrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub doc_id: DocId,
    pub content: String,
    pub score: f32,
    pub metadata: Meta,
}

impl From<SearchResult> for SearchRecord {
    fn from(r: SearchResult) -> Self {
        Self {
            doc_id: r.doc_id,
            content: r.content.to_string(),
            score: r.score,
            metadata: (*r.metadata).clone(),
        }
    }
}
