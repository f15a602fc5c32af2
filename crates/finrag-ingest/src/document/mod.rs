pub mod error;
pub mod loader;
pub mod metadata;
pub mod pipeline;
pub mod sections;
pub mod splitter;
pub mod types;

pub use error::DocumentError;
pub use loader::{LoaderRegistry, TextLoader};
pub use metadata::{MetadataClassifier, MetadataRecord};
pub use pipeline::{ChunkRecord, ChunkStrategy, IngestReport, IngestionPipeline};
pub use sections::{Section, SectionChunk, SectionSegmenter};
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Chunk, Document, DocumentMetadata};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}
