//! In-memory document corpus used to ground debate participants.
//!
//! Documents are split into overlapping word windows by a [`SentenceSplitter`] and kept in a
//! [`CorpusIndex`], which implements [`Retriever`] with lexical overlap scoring. The index is
//! immutable once built; uploading new documents means building a new index.
//!
//! ```rust
//! use debatellm::corpus::{CorpusIndex, Document, SentenceSplitter};
//!
//! let index = CorpusIndex::build(
//!     vec![Document::new("inception.txt", "Cobb spins the top at the kitchen table.")],
//!     SentenceSplitter::default(),
//! )
//! .unwrap();
//! assert_eq!(index.len(), 1);
//! ```

use crate::error::{BoxError, DebateError};
use crate::retrieval::{jaccard_similarity, normalized_terms, ContextChunk, Retriever};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

/// A named source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: String,
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Splits text into windows of `chunk_size` words, each sharing `chunk_overlap`
/// words with the previous window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 20,
        }
    }
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, DebateError> {
        let splitter = Self {
            chunk_size,
            chunk_overlap,
        };
        splitter.validate()?;
        Ok(splitter)
    }

    pub fn validate(&self) -> Result<(), DebateError> {
        if self.chunk_size == 0 {
            return Err(DebateError::Configuration(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(DebateError::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Split `text` into chunks. Whitespace is normalised to single spaces.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    source: String,
    text: String,
    terms: HashSet<String>,
}

/// Searchable set of chunks built from a document corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    chunks: Vec<IndexedChunk>,
}

impl CorpusIndex {
    /// Index `documents` in order.
    pub fn build(
        documents: Vec<Document>,
        splitter: SentenceSplitter,
    ) -> Result<Self, DebateError> {
        splitter.validate()?;

        let mut chunks = Vec::new();
        for document in documents {
            for text in splitter.split(&document.text) {
                chunks.push(IndexedChunk {
                    source: document.source.clone(),
                    terms: normalized_terms(&text),
                    text,
                });
            }
        }
        log::info!("CorpusIndex built with {} chunks", chunks.len());
        Ok(Self { chunks })
    }

    /// Load every `.txt` file in `dir` (sorted by file name) and index it.
    /// A missing directory yields an empty index. Bytes that are not valid UTF-8 are
    /// replaced rather than failing the load.
    pub async fn from_directory(
        dir: impl AsRef<Path>,
        splitter: SentenceSplitter,
    ) -> Result<Self, DebateError> {
        let dir = dir.as_ref();
        if !tokio::fs::try_exists(dir).await? {
            log::warn!("Corpus directory {} does not exist", dir.display());
            return Self::build(Vec::new(), splitter);
        }

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_text = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false);
            if is_text && entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path).await?;
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("{} is not valid UTF-8; replacing undecodable bytes", source);
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            };
            documents.push(Document::new(source, text));
        }
        Self::build(documents, splitter)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Score every chunk against `query` and keep the best `top_k` with a positive score.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ContextChunk> {
        let query_terms = normalized_terms(query);
        let mut scored: Vec<ContextChunk> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let score = jaccard_similarity(&query_terms, &chunk.terms);
                (score > 0.0).then(|| ContextChunk {
                    source: chunk.source.clone(),
                    text: chunk.text.clone(),
                    score,
                })
            })
            .collect();

        // stable: equal scores keep corpus order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }
}

#[async_trait]
impl Retriever for CorpusIndex {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ContextChunk>, BoxError> {
        Ok(self.search(query, top_k))
    }
}
