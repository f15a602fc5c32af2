//! Destinations for chunk records produced by the ingestion pipeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::{ChunkRecord, DocumentError};

pub trait ChunkSink {
    /// Persist one batch of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialized or written.
    fn write(&mut self, records: &[ChunkRecord]) -> Result<(), DocumentError>;

    /// # Errors
    ///
    /// Returns an error if buffered output cannot be flushed.
    fn flush(&mut self) -> Result<(), DocumentError> {
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonlSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonlSink<BufWriter<File>> {
    /// Create (or truncate) `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(path: &Path) -> Result<Self, DocumentError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ChunkSink for JsonlSink<W> {
    fn write(&mut self, records: &[ChunkRecord]) -> Result<(), DocumentError> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
        }
        self.written += records.len();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DocumentError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ChunkRecord>,
    pub batches: usize,
}

impl ChunkSink for MemorySink {
    fn write(&mut self, records: &[ChunkRecord]) -> Result<(), DocumentError> {
        self.records.extend_from_slice(records);
        self.batches += 1;
        Ok(())
    }
}
