use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DataConfig;
use crate::error::Result;

/// One paragraph-sized slice of a `.txt` file, ready to become a document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub source: String,
    pub doc_type: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, overlap_percent: 0.2 }
    }
}

impl From<&DataConfig> for ChunkingConfig {
    fn from(c: &DataConfig) -> Self {
        Self { max_tokens: c.max_tokens, overlap_percent: c.overlap_percent.clamp(0.0, 0.9) }
    }
}

const WORDS_PER_WINDOW: usize = 300;

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<TextChunk>> {
        self.process_directory_limited(data_dir, None)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: Option<usize>) -> Result<Vec<TextChunk>> {
        let mut files = self.list_txt_files(data_dir);
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        if let Some(limit) = limit {
            if files.len() > limit {
                files.truncate(limit);
                tracing::info!(limit, "limited to first files");
            }
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!(file = %file_path.display(), n = file_index + 1, of = files.len(), "processing");
            let content = self.read_file_content(file_path)?;
            all_chunks.extend(self.chunk_content(&content, file_path));
        }
        tracing::info!(files = files.len(), chunks = all_chunks.len(), "processed text files");
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    /// Paragraphs (blank-line separated) become chunks; oversized ones are
    /// split into overlapping word windows.
    pub fn chunk_content(&self, content: &str, file_path: &Path) -> Vec<TextChunk> {
        let source = file_path.to_string_lossy().to_string();
        let mut pieces = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() { continue; }
            if self.count_tokens(paragraph) <= self.chunking_config.max_tokens {
                pieces.push(paragraph.to_string());
            } else {
                pieces.extend(self.split_paragraph_with_overlap(paragraph));
            }
        }
        let total_chunks = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| TextChunk {
                source: source.clone(),
                doc_type: "txt".to_string(),
                content,
                chunk_index,
                total_chunks,
            })
            .collect()
    }

    fn count_tokens(&self, text: &str) -> usize { let word_count = text.split_whitespace().count(); (word_count as f32 / 0.75) as usize }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let overlap_words = ((WORDS_PER_WINDOW as f32 * self.chunking_config.overlap_percent) as usize).min(WORDS_PER_WINDOW - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + WORDS_PER_WINDOW).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
