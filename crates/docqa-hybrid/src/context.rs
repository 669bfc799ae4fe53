use serde::Serialize;

use docqa_core::types::SearchRecord;

const UNKNOWN: &str = "Unknown";

/// Where a passage came from, as shown next to an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub source: String,
    pub doc_type: String,
    pub relevance_score: f32,
}

/// Passages retrieved for a question, ready for prompt construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedContext {
    pub passages: Vec<SearchRecord>,
    pub sources: Vec<SourceRef>,
    /// Mean relevance over `sources`, 0.0 when nothing was found.
    pub confidence: f32,
}

impl RetrievedContext {
    pub fn from_records(passages: Vec<SearchRecord>) -> Self {
        let sources: Vec<SourceRef> = passages
            .iter()
            .map(|r| SourceRef {
                source: meta_str(r, "source"),
                doc_type: meta_str(r, "doc_type"),
                relevance_score: r.score,
            })
            .collect();
        let confidence = if sources.is_empty() {
            0.0
        } else {
            sources.iter().map(|s| s.relevance_score).sum::<f32>() / sources.len() as f32
        };
        Self { passages, sources, confidence }
    }

    /// No passage matched; the caller should answer that nothing relevant
    /// was found.
    pub fn is_empty(&self) -> bool { self.passages.is_empty() }
}

fn meta_str(record: &SearchRecord, key: &str) -> String {
    match record.metadata.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => UNKNOWN.to_string(),
        Some(other) => other.to_string(),
    }
}
