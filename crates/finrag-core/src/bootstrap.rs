//! Turns a [`Config`] into ready-to-run pipeline components.

use std::path::{Path, PathBuf};

use finrag_ingest::RecordIngestor;
use finrag_ingest::document::{IngestionPipeline, LoaderRegistry, SplitterConfig, TextSplitter};

use crate::config::Config;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Priority: `--config` argument > `FINRAG_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("FINRAG_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Resolve, load and validate the configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or the values are invalid.
pub fn load_config(cli: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_config_path(cli);
    let config = Config::load(&path)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

#[must_use]
pub fn build_splitter(config: &Config) -> TextSplitter {
    TextSplitter::new(SplitterConfig {
        chunk_size: config.chunking.chunk_size,
        chunk_overlap: config.chunking.chunk_overlap,
    })
}

#[must_use]
pub fn build_pipeline(config: &Config) -> IngestionPipeline {
    IngestionPipeline::new(build_splitter(config), config.ingest.collection.clone())
        .with_markers(&config.chunking.section_markers)
        .with_strategy(config.chunking.strategy)
        .with_batch_size(config.ingest.batch_size)
}

#[must_use]
pub fn build_registry(config: &Config) -> LoaderRegistry {
    LoaderRegistry::with_max_file_size(config.ingest.max_file_size)
}

#[must_use]
pub fn build_record_ingestor(config: &Config) -> RecordIngestor {
    RecordIngestor::new(build_splitter(config)).with_min_content_len(config.records.min_content_len)
}
