use serde::{Deserialize, Serialize};

use finrag_ingest::document::ChunkStrategy;
use finrag_ingest::document::sections::DEFAULT_SECTION_MARKERS;
use finrag_ingest::records::DEFAULT_MIN_CONTENT_LEN;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub records: RecordsConfig,
}

fn default_data_dir() -> String {
    "./data".into()
}

fn default_output() -> String {
    "./data/processed/chunks.jsonl".into()
}

fn default_collection() -> String {
    "finance_docs".into()
}

fn default_batch_size() -> usize {
    100
}

fn default_max_file_size() -> u64 {
    finrag_ingest::document::DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Root of the regulator document tree (`RBI/`, `SEBI/`, `AMFI/`, ...).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output: default_output(),
            collection: default_collection(),
            batch_size: default_batch_size(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    800
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_section_markers() -> Vec<String> {
    DEFAULT_SECTION_MARKERS
        .iter()
        .map(|m| (*m).to_owned())
        .collect()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default)]
    pub strategy: ChunkStrategy,
    #[serde(default = "default_section_markers")]
    pub section_markers: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            strategy: ChunkStrategy::default(),
            section_markers: default_section_markers(),
        }
    }
}

fn default_processed_dir() -> String {
    "./data/processed".into()
}

fn default_records_output() -> String {
    "./data/processed/records.jsonl".into()
}

fn default_min_content_len() -> usize {
    DEFAULT_MIN_CONTENT_LEN
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecordsConfig {
    /// Directory holding `tax_rules.json`, `investment_options.json` and `budgeting_rules.json`.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: String,
    #[serde(default = "default_min_content_len")]
    pub min_content_len: usize,
    #[serde(default = "default_records_output")]
    pub output: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            processed_dir: default_processed_dir(),
            min_content_len: default_min_content_len(),
            output: default_records_output(),
        }
    }
}
