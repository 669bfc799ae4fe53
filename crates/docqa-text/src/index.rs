use std::collections::HashSet;

use crate::tokenize::unique_tokens;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalHit {
    pub position: usize,
    pub score: f32,
}

/// Overlap score of a document against a query, or `None` when they share no
/// token.
///
/// `overlap / (|Q| * ln(1 + |D|))`: the log term damps documents with large
/// vocabularies.
pub fn score(query: &HashSet<String>, doc: &HashSet<String>) -> Option<f32> {
    let (small, large) = if query.len() <= doc.len() { (query, doc) } else { (doc, query) };
    let overlap = small.iter().filter(|t| large.contains(*t)).count();
    if overlap == 0 {
        return None;
    }
    let denom = query.len() as f64 * (1.0 + doc.len() as f64).ln();
    Some((overlap as f64 / denom) as f32)
}

/// Token sets of every indexed text, by insertion position.
#[derive(Debug, Default, Clone)]
pub struct LexicalIndex {
    entries: Vec<HashSet<String>>,
}

impl LexicalIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn add<S: AsRef<str>>(&mut self, texts: &[S]) {
        self.entries.extend(texts.iter().map(|t| unique_tokens(t.as_ref())));
    }

    /// Best `k` overlapping documents, highest score first; equal scores keep
    /// corpus order.
    pub fn search(&self, query: &str, k: usize) -> Vec<LexicalHit> {
        let q = unique_tokens(query);
        if q.is_empty() || k == 0 {
            return vec![];
        }
        let mut hits: Vec<LexicalHit> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, d)| score(&q, d).map(|score| LexicalHit { position, score }))
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        tracing::debug!(query_tokens = q.len(), hits = hits.len(), "lexical search");
        hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
