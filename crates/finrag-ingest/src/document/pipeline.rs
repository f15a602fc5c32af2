use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::sections::{SectionChunk, SectionSegmenter};
use super::{
    Document, DocumentError, DocumentLoader, LoaderRegistry, MetadataClassifier, TextSplitter,
};
use crate::sink::ChunkSink;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Plain key/value record handed to embedding and vector-store consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub collection: String,
    pub text: String,
    pub metadata: Map<String, Value>,
}

impl ChunkRecord {
    /// Deterministic id: the same chunk position always maps to the same id.
    #[must_use]
    pub fn stable_id(key: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Heading-aware segmentation, then sentence packing per section.
    #[default]
    Sections,
    /// Sentence packing over the whole document.
    Sentences,
}

impl std::str::FromStr for ChunkStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sections" => Ok(Self::Sections),
            "sentences" => Ok(Self::Sentences),
            other => Err(format!("unknown chunk strategy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub documents: usize,
    pub chunks: usize,
}

pub struct IngestionPipeline {
    segmenter: SectionSegmenter,
    classifier: MetadataClassifier,
    collection: String,
    strategy: ChunkStrategy,
    batch_size: usize,
}

impl IngestionPipeline {
    pub fn new(splitter: TextSplitter, collection: impl Into<String>) -> Self {
        Self {
            segmenter: SectionSegmenter::new(splitter),
            classifier: MetadataClassifier::default(),
            collection: collection.into(),
            strategy: ChunkStrategy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.segmenter = self.segmenter.with_markers(markers);
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: MetadataClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn strategy(&self) -> ChunkStrategy {
        self.strategy
    }

    /// Classify and chunk a document without touching any storage.
    #[must_use]
    pub fn records(&self, document: &Document) -> Vec<ChunkRecord> {
        let meta = &document.metadata;
        let tags = self
            .classifier
            .classify(Path::new(&meta.source))
            .with_page(meta.page_number);

        let mut base = tags.to_fields();
        base.insert("content_type".into(), json!(meta.content_type));
        for (key, value) in &meta.extra {
            base.entry(key.clone()).or_insert_with(|| json!(value));
        }

        let page = meta.page_number.unwrap_or(0);
        self.chunk(&document.content)
            .into_iter()
            .map(|chunk| {
                let mut metadata = base.clone();
                if self.strategy == ChunkStrategy::Sections {
                    metadata.insert("section_title".into(), json!(chunk.section_title));
                }
                metadata.insert("chunk_index".into(), json!(chunk.chunk_index));
                metadata.insert("total_chunks".into(), json!(chunk.total_chunks));
                metadata.insert(
                    "content_hash".into(),
                    json!(blake3::hash(chunk.text.as_bytes()).to_hex().to_string()),
                );
                let key = format!(
                    "{}#{page}#{}#{}",
                    meta.source, chunk.section_ordinal, chunk.chunk_index
                );
                ChunkRecord {
                    id: ChunkRecord::stable_id(&key),
                    collection: self.collection.clone(),
                    text: chunk.text,
                    metadata,
                }
            })
            .collect()
    }

    fn chunk(&self, text: &str) -> Vec<SectionChunk> {
        match self.strategy {
            ChunkStrategy::Sections => self.segmenter.chunk(text),
            ChunkStrategy::Sentences => {
                let pieces = self.segmenter.splitter().chunk_text(text);
                let total_chunks = pieces.len();
                pieces
                    .into_iter()
                    .enumerate()
                    .map(|(chunk_index, text)| SectionChunk {
                        text,
                        section_title: String::new(),
                        section_ordinal: 0,
                        chunk_index,
                        total_chunks,
                    })
                    .collect()
            }
        }
    }

    /// Chunk a document and write its records in batches. Returns chunk count.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a batch.
    pub fn ingest<S>(&self, document: &Document, sink: &mut S) -> Result<usize, DocumentError>
    where
        S: ChunkSink + ?Sized,
    {
        let records = self.records(document);
        if records.is_empty() {
            return Ok(0);
        }
        for batch in records.chunks(self.batch_size) {
            sink.write(batch)?;
        }
        tracing::debug!(
            source = %document.metadata.source,
            chunks = records.len(),
            "ingested document"
        );
        Ok(records.len())
    }

    /// # Errors
    ///
    /// Returns an error if loading fails or the sink rejects a batch.
    pub async fn load_and_ingest<S>(
        &self,
        loader: &(dyn DocumentLoader + '_),
        path: &Path,
        sink: &mut S,
    ) -> Result<usize, DocumentError>
    where
        S: ChunkSink + ?Sized,
    {
        let documents = loader.load(path).await?;
        let mut total = 0;
        for doc in &documents {
            total += self.ingest(doc, sink)?;
        }
        Ok(total)
    }

    /// Walk `root` recursively and ingest every file a registered loader accepts.
    ///
    /// Files that fail to load are logged and counted; sink failures abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or the sink fails.
    pub async fn ingest_dir<S>(
        &self,
        root: &Path,
        registry: &LoaderRegistry,
        sink: &mut S,
    ) -> Result<IngestReport, DocumentError>
    where
        S: ChunkSink + ?Sized,
    {
        tokio::fs::metadata(root).await?;

        let entries: Vec<_> = ignore::WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(false)
            .parents(false)
            .sort_by_file_path(Ord::cmp)
            .build()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .collect();

        let mut report = IngestReport::default();
        tracing::info!(root = %root.display(), files = entries.len(), "ingestion started");

        for entry in &entries {
            let path = entry.path();
            report.files_scanned += 1;

            let Some(loader) = registry.for_path(path) else {
                tracing::debug!(path = %path.display(), "no loader for file, skipping");
                report.files_skipped += 1;
                continue;
            };

            let documents = match loader.load(path).await {
                Ok(docs) => docs,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to load document: {e}");
                    report.files_failed += 1;
                    continue;
                }
            };

            report.documents += documents.len();
            for doc in &documents {
                report.chunks += self.ingest(doc, sink)?;
            }
        }

        sink.flush()?;
        tracing::info!(
            scanned = report.files_scanned,
            skipped = report.files_skipped,
            failed = report.files_failed,
            documents = report.documents,
            chunks = report.chunks,
            "ingestion finished"
        );
        Ok(report)
    }
}
