//! Document loading, sentence and section chunking, and filename-driven
//! metadata tagging for Indian personal-finance sources.

pub mod document;
pub mod records;
pub mod sink;

pub use records::{RecordIngestor, RecordReport};
pub use sink::{ChunkSink, JsonlSink, MemorySink};
