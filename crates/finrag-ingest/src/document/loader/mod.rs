mod text;
pub use text::TextLoader;

#[cfg(feature = "pdf")]
mod pdf;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

use std::path::Path;

use super::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader};

/// Picks a loader by file extension.
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_max_file_size(DEFAULT_MAX_FILE_SIZE)
    }
}

impl LoaderRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// All built-in loaders sharing one size limit.
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextLoader { max_file_size }));
        #[cfg(feature = "pdf")]
        registry.register(Box::new(PdfLoader { max_file_size }));
        registry
    }

    pub fn register(&mut self, loader: Box<dyn DocumentLoader>) {
        self.loaders.push(loader);
    }

    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<&dyn DocumentLoader> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.loaders
            .iter()
            .find(|l| l.supported_extensions().contains(&ext.as_str()))
            .map(Box::as_ref)
    }

    /// Load `path` with the loader registered for its extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] when no loader accepts the
    /// extension, or the loader's own error.
    pub async fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let Some(loader) = self.for_path(path) else {
            return Err(DocumentError::UnsupportedFormat(path.display().to_string()));
        };
        loader.load(path).await
    }
}
