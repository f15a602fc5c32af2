use std::str::FromStr;

use super::Config;

/// Parse `key` when set. Malformed values are logged and ignored.
pub(crate) fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let v = std::env::var(key).ok()?;
    match v.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring invalid {key} value: {v}");
            None
        }
    }
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("FINRAG_DATA_DIR") {
            self.ingest.data_dir = v;
        }
        if let Ok(v) = std::env::var("FINRAG_OUTPUT") {
            self.ingest.output = v;
        }
        if let Ok(v) = std::env::var("FINRAG_COLLECTION") {
            self.ingest.collection = v;
        }
        if let Some(n) = parse_env("FINRAG_BATCH_SIZE") {
            self.ingest.batch_size = n;
        }
        if let Some(n) = parse_env("FINRAG_MAX_FILE_SIZE") {
            self.ingest.max_file_size = n;
        }
        if let Some(n) = parse_env("FINRAG_CHUNK_SIZE") {
            self.chunking.chunk_size = n;
        }
        if let Some(n) = parse_env("FINRAG_CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = n;
        }
        if let Some(strategy) = parse_env("FINRAG_CHUNK_STRATEGY") {
            self.chunking.strategy = strategy;
        }
        if let Ok(v) = std::env::var("FINRAG_SECTION_MARKERS") {
            self.chunking.section_markers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(v) = std::env::var("FINRAG_PROCESSED_DIR") {
            self.records.processed_dir = v;
        }
        if let Ok(v) = std::env::var("FINRAG_RECORDS_OUTPUT") {
            self.records.output = v;
        }
        if let Some(n) = parse_env("FINRAG_MIN_CONTENT_LEN") {
            self.records.min_content_len = n;
        }
    }
}
