use std::io::Write;

use finrag_ingest::document::ChunkStrategy;
use serial_test::serial;

use super::*;

const ENV_KEYS: [&str; 12] = [
    "FINRAG_DATA_DIR",
    "FINRAG_OUTPUT",
    "FINRAG_COLLECTION",
    "FINRAG_BATCH_SIZE",
    "FINRAG_MAX_FILE_SIZE",
    "FINRAG_CHUNK_SIZE",
    "FINRAG_CHUNK_OVERLAP",
    "FINRAG_CHUNK_STRATEGY",
    "FINRAG_SECTION_MARKERS",
    "FINRAG_PROCESSED_DIR",
    "FINRAG_RECORDS_OUTPUT",
    "FINRAG_MIN_CONTENT_LEN",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn defaults_when_file_missing() {
    let config = Config::default();
    assert_eq!(config.ingest.data_dir, "./data");
    assert_eq!(config.ingest.output, "./data/processed/chunks.jsonl");
    assert_eq!(config.ingest.collection, "finance_docs");
    assert_eq!(config.ingest.batch_size, 100);
    assert_eq!(config.ingest.max_file_size, 50 * 1024 * 1024);
    assert_eq!(config.chunking.chunk_size, 800);
    assert_eq!(config.chunking.chunk_overlap, 100);
    assert_eq!(config.chunking.strategy, ChunkStrategy::Sections);
    assert!(config.chunking.section_markers.contains(&"Section".to_owned()));
    assert_eq!(config.records.processed_dir, "./data/processed");
    assert_eq!(config.records.min_content_len, 100);
    config.validate().unwrap();
}

#[test]
#[serial]
fn load_missing_file_uses_defaults() {
    clear_env();
    let config = Config::load(Path::new("/nonexistent/finrag.toml")).unwrap();
    assert_eq!(config.chunking.chunk_size, 800);
}

#[test]
#[serial]
fn parse_valid_toml() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    write!(
        f,
        r#"
[ingest]
data_dir = "./corpus"
collection = "rbi_docs"

[chunking]
chunk_size = 500
chunk_overlap = 50
strategy = "sentences"
section_markers = ["Schedule", "Part"]

[records]
min_content_len = 200
"#
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.ingest.data_dir, "./corpus");
    assert_eq!(config.ingest.collection, "rbi_docs");
    assert_eq!(config.ingest.batch_size, 100);
    assert_eq!(config.chunking.chunk_size, 500);
    assert_eq!(config.chunking.chunk_overlap, 50);
    assert_eq!(config.chunking.strategy, ChunkStrategy::Sentences);
    assert_eq!(config.chunking.section_markers, vec!["Schedule", "Part"]);
    assert_eq!(config.records.min_content_len, 200);
    assert_eq!(config.records.output, "./data/processed/records.jsonl");
}

#[test]
#[serial]
fn malformed_toml_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[chunking\nchunk_size = ").unwrap();
    assert!(Config::load(&path).is_err());
}

#[test]
#[serial]
fn unknown_strategy_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strategy.toml");
    std::fs::write(&path, "[chunking]\nstrategy = \"paragraphs\"\n").unwrap();
    assert!(Config::load(&path).is_err());
}

#[test]
#[serial]
fn env_overrides() {
    clear_env();
    let mut config = Config::default();

    unsafe {
        std::env::set_var("FINRAG_DATA_DIR", "/srv/finance");
        std::env::set_var("FINRAG_COLLECTION", "sebi");
        std::env::set_var("FINRAG_BATCH_SIZE", "25");
        std::env::set_var("FINRAG_CHUNK_SIZE", "600");
        std::env::set_var("FINRAG_CHUNK_OVERLAP", "60");
        std::env::set_var("FINRAG_CHUNK_STRATEGY", "sentences");
        std::env::set_var("FINRAG_SECTION_MARKERS", "Schedule, Part ,");
        std::env::set_var("FINRAG_MIN_CONTENT_LEN", "10");
    };
    config.apply_env_overrides();
    clear_env();

    assert_eq!(config.ingest.data_dir, "/srv/finance");
    assert_eq!(config.ingest.collection, "sebi");
    assert_eq!(config.ingest.batch_size, 25);
    assert_eq!(config.chunking.chunk_size, 600);
    assert_eq!(config.chunking.chunk_overlap, 60);
    assert_eq!(config.chunking.strategy, ChunkStrategy::Sentences);
    assert_eq!(config.chunking.section_markers, vec!["Schedule", "Part"]);
    assert_eq!(config.records.min_content_len, 10);
}

#[test]
#[serial]
fn invalid_env_values_are_ignored() {
    clear_env();
    let mut config = Config::default();

    unsafe {
        std::env::set_var("FINRAG_BATCH_SIZE", "many");
        std::env::set_var("FINRAG_CHUNK_STRATEGY", "paragraphs");
    };
    config.apply_env_overrides();
    clear_env();

    assert_eq!(config.ingest.batch_size, 100);
    assert_eq!(config.chunking.strategy, ChunkStrategy::Sections);
}

#[test]
#[serial]
fn malformed_numeric_env_values_keep_defaults() {
    clear_env();
    let mut config = Config::default();

    unsafe {
        std::env::set_var("FINRAG_MAX_FILE_SIZE", "50MiB");
        std::env::set_var("FINRAG_CHUNK_SIZE", "-1");
        std::env::set_var("FINRAG_CHUNK_OVERLAP", "1.5");
        std::env::set_var("FINRAG_MIN_CONTENT_LEN", "");
    };
    config.apply_env_overrides();

    assert_eq!(super::env::parse_env::<usize>("FINRAG_CHUNK_SIZE"), None);
    assert_eq!(super::env::parse_env::<u64>("FINRAG_MAX_FILE_SIZE"), None);
    clear_env();
    assert_eq!(super::env::parse_env::<usize>("FINRAG_CHUNK_SIZE"), None);

    assert_eq!(config.ingest.max_file_size, 50 * 1024 * 1024);
    assert_eq!(config.chunking.chunk_size, 800);
    assert_eq!(config.chunking.chunk_overlap, 100);
    assert_eq!(config.records.min_content_len, 100);
}

#[test]
#[serial]
fn parse_env_reads_well_formed_values() {
    clear_env();
    unsafe { std::env::set_var("FINRAG_BATCH_SIZE", "42") };
    assert_eq!(super::env::parse_env::<usize>("FINRAG_BATCH_SIZE"), Some(42));
    clear_env();
}

#[test]
fn validate_rejects_zero_chunk_size() {
    let mut config = Config::default();
    config.chunking.chunk_size = 0;
    config.chunking.chunk_overlap = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_overlap_not_below_size() {
    let mut config = Config::default();
    config.chunking.chunk_overlap = config.chunking.chunk_size;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("chunk_overlap"));
}

#[test]
fn validate_rejects_zero_batch_size() {
    let mut config = Config::default();
    config.ingest.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn serializes_back_to_toml() {
    let text = toml::to_string(&Config::default()).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.chunking.strategy, ChunkStrategy::Sections);
    assert_eq!(parsed.ingest.collection, "finance_docs");
}
