use std::fs;
use std::io::Write;
use tempfile::TempDir;

use chrono::Duration;
use docqa_core::clock::ManualClock;
use docqa_core::config::{Config, FusionIdentity, RetrievalConfig};
use docqa_core::data_processor::{ChunkingConfig, DataProcessor};
use docqa_core::traits::Clock;
use docqa_core::Error;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].content.trim(), "Short text");
    assert_eq!(chunks[0].doc_type, "txt");
    assert!(chunks[0].source.ends_with("a.txt"));
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();
    fs::write(dir.join("ignored.md"), "echo").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor
        .process_directory_limited(dir, Some(1))
        .expect("process limited");

    let mut sources = std::collections::HashSet::new();
    for c in &chunks { sources.insert(c.source.clone()); }
    assert_eq!(sources.len(), 1, "limited to one source document");
    assert_eq!(chunks[0].content, "alpha bravo");
}

#[test]
fn paragraphs_split_and_numbered() {
    let processor = DataProcessor::new();
    let chunks = processor.chunk_content("first para\n\n\n\nsecond para\n\n  ", std::path::Path::new("x.txt"));
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].chunk_index, 1);
    assert!(chunks.iter().all(|c| c.total_chunks == 2));
}

#[test]
fn long_paragraph_windows_overlap() {
    let processor = DataProcessor::with_config(ChunkingConfig { max_tokens: 10, overlap_percent: 0.1 });
    let words: Vec<String> = (0..700).map(|i| format!("w{i}")).collect();
    let chunks = processor.chunk_content(&words.join(" "), std::path::Path::new("long.txt"));
    // windows of 300 words, stepping 270
    assert_eq!(chunks.len(), 3);
    assert!(chunks[1].content.starts_with("w270 "));
    assert!(chunks[2].content.ends_with("w699"));
}

#[test]
fn config_defaults_match_documented_values() {
    let settings = Config::from_toml_str("").expect("config").settings().expect("settings");
    let r = settings.retrieval;
    assert_eq!(r.embedding_cache_capacity, 1000);
    assert_eq!(r.result_cache_capacity, 10_000);
    assert_eq!(r.result_cache_ttl_secs, 86_400);
    assert!((r.rrf_k - 60.0).abs() < f32::EPSILON);
    assert_eq!(r.fusion_identity, FusionIdentity::Document);
    assert_eq!(settings.embedding.provider, "hashing");
}

#[test]
fn config_toml_overrides_sections() {
    let cfg = Config::from_toml_str(
        r#"
        [retrieval]
        default_k = 3
        fusion_identity = "content"

        [embedding]
        dimension = 64
        "#,
    )
    .expect("config");
    let r: RetrievalConfig = cfg.get("retrieval").expect("retrieval");
    assert_eq!(r.default_k, 3);
    assert_eq!(r.fusion_identity, FusionIdentity::Content);
    assert_eq!(r.embedding_cache_capacity, 1000, "untouched keys keep defaults");
    assert_eq!(cfg.settings().unwrap().embedding.dimension, 64);
}

#[test]
fn config_rejects_zero_capacity() {
    let err = Config::from_toml_str("[retrieval]\nresult_cache_capacity = 0\n").err().expect("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)));
    let bad_k = RetrievalConfig { rrf_k: 0.0, ..RetrievalConfig::default() };
    assert!(bad_k.validate().is_err());
}

#[test]
fn manual_clock_only_moves_when_advanced() {
    let clock = ManualClock::default();
    let t0 = clock.now();
    assert_eq!(clock.now(), t0);
    clock.advance(Duration::hours(25));
    assert_eq!(clock.now() - t0, Duration::hours(25));
}

#[test]
fn resolve_with_base_keeps_absolute_paths() {
    let base = std::path::Path::new("/srv/docqa");
    assert_eq!(docqa_core::config::resolve_with_base(base, "/tmp/x"), std::path::PathBuf::from("/tmp/x"));
    assert_eq!(docqa_core::config::resolve_with_base(base, "data"), std::path::PathBuf::from("/srv/docqa/data"));
}
