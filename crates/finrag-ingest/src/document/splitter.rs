use std::sync::LazyLock;

use regex::Regex;

use super::types::{Chunk, Document};

// Runs of terminal punctuation followed by whitespace. Abbreviations ("Rs. 5")
// and decimals followed by a space split here too.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("sentence boundary regex is valid"));

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters carried from the end of a chunk into the next one.
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split `text` into sentences and pack them into overlapping chunks.
    #[must_use]
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let sentences = split_sentences(text);
        merge_sentences(
            &sentences,
            self.config.chunk_size,
            self.config.chunk_overlap,
        )
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.chunk_text(&document.content)
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk {
                content,
                metadata: document.metadata.clone(),
                chunk_index: i,
            })
            .collect()
    }
}

/// Split on runs of `.`, `!` or `?` followed by whitespace.
///
/// The delimiter run is consumed, so only the last sentence of a text keeps
/// its terminal punctuation. Pieces are trimmed and empty pieces dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Greedily pack sentences into chunks of at most `chunk_size` characters.
///
/// When a chunk closes, its last `chunk_overlap` characters always seed the
/// next chunk, followed by the sentence that did not fit. A chunk exceeds
/// `chunk_size` only when a single sentence, alone or behind that seed, is
/// too long; nothing is appended after it.
#[must_use]
pub fn merge_sentences(sentences: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();

        if current_len > 0 && current_len + 1 + sentence_len > chunk_size {
            let closed = current.trim().to_owned();
            current.clear();
            current_len = 0;

            if chunk_overlap > 0 {
                let tail = char_suffix(&closed, chunk_overlap).trim_start();
                current.push_str(tail);
                current_len = tail.chars().count();
            }
            chunks.push(closed);
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += sentence_len;
    }

    let rest = current.trim();
    if !rest.is_empty() {
        chunks.push(rest.to_owned());
    }

    chunks
}

/// Last `n` characters of `s`, never splitting a code point.
fn char_suffix(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if n >= total {
        return s;
    }
    let start = s
        .char_indices()
        .nth(total - n)
        .map_or(s.len(), |(idx, _)| idx);
    &s[start..]
}
