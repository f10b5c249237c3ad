//! Retrieval seam between debate backends and whatever corpus is currently indexed.
//!
//! A [`Retriever`] hands back the `top_k` passages most relevant to a message. The grounded
//! chat engine calls it before every LLM round-trip; nothing else in the crate touches the index.

use crate::error::BoxError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;

/// One passage of supporting context returned by a [`Retriever`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextChunk {
    /// Name of the document the passage came from (e.g. `"inception.txt"`).
    pub source: String,
    /// Passage text as it will be shown to the model.
    pub text: String,
    /// Relevance in `0.0..=1.0`; higher is better.
    pub score: f32,
}

/// Supplies grounding context for a message.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `top_k` passages, best first.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ContextChunk>, BoxError>;
}

/// Retriever used when no corpus has been indexed; always returns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetrieval;

#[async_trait]
impl Retriever for NoRetrieval {
    async fn retrieve(&self, _query: &str, _top_k: usize) -> Result<Vec<ContextChunk>, BoxError> {
        Ok(Vec::new())
    }
}

/// Lowercased word set of `text`. Surrounding punctuation is trimmed first, then words of
/// two characters or fewer are dropped.
pub fn normalized_terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity (`|intersection| / |union|`) of two term sets.
/// Returns `0.0` when either side is empty.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union as f32
}
