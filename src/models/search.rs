use serde::{Deserialize, Serialize};

use super::document::DocId;

/// A ranked search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    pub score: f32,
}

/// Relevance function used to rank candidate documents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    /// `sum(query_tf * doc_tf) / doc_length`
    TfNormalized,
    /// Okapi BM25
    #[default]
    Bm25,
}

/// How many of the query's terms a document must contain to match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// At least one term
    #[default]
    Any,
    /// Every distinct term
    All,
}

/// Per-call search options
#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub limit: usize,
    pub match_mode: MatchMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            match_mode: MatchMode::Any,
        }
    }
}

impl SearchOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }
}
