use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    /// File path or URL the text was read from.
    pub source: String,
    pub content_type: String,
    /// 1-based page number when the loader reads paged formats.
    pub page_number: Option<u32>,
    /// Free-form attributes such as `title`, `year` or `extracted_date`.
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    #[must_use]
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                content_type: "text/plain".to_owned(),
                ..DocumentMetadata::default()
            },
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub content: String,
    pub metadata: DocumentMetadata,
    pub chunk_index: usize,
}
