//! Heading-driven segmentation of regulatory and tax documents.

use std::sync::LazyLock;

use regex::Regex;

use super::splitter::TextSplitter;

/// Heading prefixes common in Indian tax acts, circulars and investor guides.
pub const DEFAULT_SECTION_MARKERS: &[&str] = &[
    "Section",
    "Chapter",
    "Rule",
    "Clause",
    "Subsection",
    "Para",
    "Article",
];

/// Title given to content that precedes the first heading.
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// Section titles are cut to this many characters.
pub const MAX_TITLE_CHARS: usize = 100;

static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("numbered heading regex is valid"));

/// A heading-delimited region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Zero-based position of the section within its document.
    pub ordinal: usize,
    pub title: String,
    /// Non-blank trimmed lines joined by `\n`, heading line included.
    pub body: String,
}

/// One chunk of a section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChunk {
    pub text: String,
    pub section_title: String,
    pub section_ordinal: usize,
    /// Zero-based index within the section.
    pub chunk_index: usize,
    /// Number of chunks produced for the section.
    pub total_chunks: usize,
}

#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    markers: Vec<String>,
    splitter: TextSplitter,
}

impl SectionSegmenter {
    #[must_use]
    pub fn new(splitter: TextSplitter) -> Self {
        Self {
            markers: DEFAULT_SECTION_MARKERS
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            splitter,
        }
    }

    /// Replace the heading markers. Matching is case-insensitive.
    #[must_use]
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.markers = markers
            .into_iter()
            .map(|m| m.as_ref().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn splitter(&self) -> &TextSplitter {
        &self.splitter
    }

    /// A trimmed line is a heading when it starts with a marker or a `N.` number.
    #[must_use]
    pub fn is_heading(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.markers.iter().any(|m| lower.starts_with(m.as_str())) || NUMBERED_HEADING.is_match(line)
    }

    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut title = INTRODUCTION_TITLE.to_owned();
        let mut body = String::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            // A heading only opens a new section once the current one has content.
            if self.is_heading(line) && !body.is_empty() {
                sections.push(Section {
                    ordinal: sections.len(),
                    title: std::mem::replace(
                        &mut title,
                        truncate_chars(line, MAX_TITLE_CHARS).to_owned(),
                    ),
                    body: std::mem::take(&mut body),
                });
            }
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(line);
        }

        if !body.is_empty() {
            sections.push(Section {
                ordinal: sections.len(),
                title,
                body,
            });
        }

        sections
    }

    /// Segment `text` and chunk every section body, preserving order.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<SectionChunk> {
        let mut out = Vec::new();
        for section in self.segment(text) {
            let pieces = self.splitter.chunk_text(&section.body);
            let total_chunks = pieces.len();
            out.extend(
                pieces
                    .into_iter()
                    .enumerate()
                    .map(|(chunk_index, text)| SectionChunk {
                        text,
                        section_title: section.title.clone(),
                        section_ordinal: section.ordinal,
                        chunk_index,
                        total_chunks,
                    }),
            );
        }
        tracing::trace!(chunks = out.len(), "sectioned text");
        out
    }
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}
