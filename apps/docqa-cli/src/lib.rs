//! Ingestion and output helpers shared by the `docqa` binary and its tests.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use docqa_core::config::DataConfig;
use docqa_core::data_processor::{ChunkingConfig, DataProcessor, TextChunk};
use docqa_core::types::{Meta, SearchRecord};
use docqa_hybrid::DocumentStore;

const INGEST_BATCH: usize = 64;

/// Chunk every `.txt` file under `dir` and add the chunks to `store`.
/// Returns the number of chunks indexed.
pub fn ingest_directory(store: &DocumentStore, dir: &Path, data: &DataConfig, progress: bool) -> anyhow::Result<usize> {
    let processor = DataProcessor::with_config(ChunkingConfig::from(data));
    let chunks = processor.process_directory(dir)?;
    if chunks.is_empty() {
        tracing::warn!(dir = %dir.display(), "no text files to ingest");
        return Ok(0);
    }

    let pb = if progress { ProgressBar::new(chunks.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")?
            .progress_chars("=> "),
    );

    let total = chunks.len();
    let mut batch = Vec::with_capacity(INGEST_BATCH);
    for chunk in chunks {
        batch.push(chunk_record(chunk));
        if batch.len() == INGEST_BATCH {
            let n = batch.len() as u64;
            store.add_documents(std::mem::take(&mut batch))?;
            pb.inc(n);
        }
    }
    if !batch.is_empty() {
        let n = batch.len() as u64;
        store.add_documents(batch)?;
        pb.inc(n);
    }
    pb.finish_with_message("indexed");
    tracing::info!(chunks = total, dir = %dir.display(), "ingest complete");
    Ok(total)
}

fn chunk_record(chunk: TextChunk) -> (String, Meta) {
    let mut meta = Meta::new();
    meta.insert("source".into(), chunk.source.into());
    meta.insert("doc_type".into(), chunk.doc_type.into());
    meta.insert("chunk_index".into(), chunk.chunk_index.into());
    meta.insert("total_chunks".into(), chunk.total_chunks.into());
    (chunk.content, meta)
}

/// Ranked plain-text listing, one block per hit.
pub fn render_results(query: &str, results: &[SearchRecord]) -> String {
    let mut out = format!("Query: {query}\n");
    if results.is_empty() {
        out.push_str("  (no results)\n");
        return out;
    }
    for (rank, r) in results.iter().enumerate() {
        let source = r.metadata.get("source").and_then(|v| v.as_str()).unwrap_or("Unknown");
        out.push_str(&format!("{:>3}. [{:.4}] {} (doc {})\n", rank + 1, r.score, source, r.doc_id));
        out.push_str(&format!("     {}\n", preview(&r.content, 160)));
    }
    out
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
