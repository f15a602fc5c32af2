use std::collections::BTreeMap;
use std::path::Path;
use std::pin::Pin;
use std::sync::LazyLock;

use regex::Regex;

use super::super::sections::{MAX_TITLE_CHARS, truncate_chars};
use super::super::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata,
};

// Assessment years ("2024-25") first, then plain calendar years.
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:19|20)\d{2}(?:-\d{2}\b)?").expect("year regex is valid")
});

/// Plain-text and markdown exports of circulars, guides and booklets.
///
/// Content is decoded lossily since many regulator exports are not clean
/// UTF-8. A leading BOM is dropped and line endings are normalised.
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for TextLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = tokio::fs::canonicalize(&path).await?;

            let size = tokio::fs::metadata(&path).await?.len();
            if size > max_size {
                return Err(DocumentError::FileTooLarge(size));
            }

            let markdown = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_lowercase().as_str(), "md" | "markdown"));

            let bytes = tokio::fs::read(&path).await?;
            let content = normalize(&String::from_utf8_lossy(&bytes));
            let extra = attributes(&path, &content, markdown);

            Ok(vec![Document {
                content,
                metadata: DocumentMetadata {
                    source: path.display().to_string(),
                    content_type: if markdown { "text/markdown" } else { "text/plain" }.to_owned(),
                    page_number: None,
                    extra,
                },
            }])
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}

fn normalize(raw: &str) -> String {
    raw.strip_prefix('\u{feff}')
        .unwrap_or(raw)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// `title` from the first heading (markdown) or first non-blank line, and
/// `year` from the file stem when it carries one.
fn attributes(path: &Path, content: &str, markdown: bool) -> BTreeMap<String, String> {
    let mut extra = BTreeMap::new();

    let first_line = || content.lines().map(str::trim).find(|l| !l.is_empty());
    let title = if markdown {
        content
            .lines()
            .map(str::trim)
            .find_map(|l| l.strip_prefix('#'))
            .map(|h| h.trim_start_matches('#').trim())
            .filter(|h| !h.is_empty())
            .or_else(first_line)
    } else {
        first_line()
    };
    if let Some(title) = title {
        extra.insert("title".to_owned(), truncate_chars(title, MAX_TITLE_CHARS).to_owned());
    }

    if let Some(year) = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| YEAR_RE.find(stem))
    {
        extra.insert("year".to_owned(), year.as_str().to_owned());
    }

    extra
}
