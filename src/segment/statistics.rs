//! Segment statistics and relevance functions
//!
//! A segment stores the analyzed length of every document plus the totals
//! needed for length normalization (`doc_count`, `avgdl`).

use serde::{Deserialize, Serialize};

use crate::config::Bm25Params;
use crate::models::DocId;

/// Statistics for a single segment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStatistics {
    /// Total number of documents in this segment
    pub doc_count: u32,
    /// Sum of all document lengths (for computing avgdl)
    pub total_doc_length: u64,
    /// Document lengths indexed by doc id
    doc_lengths: Vec<u32>,
}

impl SegmentStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document of the given length and return its doc id
    pub fn add_document(&mut self, doc_len: u32) -> DocId {
        let doc_id = self.doc_count;
        self.doc_lengths.push(doc_len);
        self.total_doc_length += doc_len as u64;
        self.doc_count += 1;
        doc_id
    }

    pub fn doc_length(&self, doc_id: DocId) -> Option<u32> {
        self.doc_lengths.get(doc_id as usize).copied()
    }

    /// Average document length (0.0 for an empty segment)
    pub fn avgdl(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_doc_length as f64 / self.doc_count as f64
        }
    }

    pub fn doc_lengths(&self) -> &[u32] {
        &self.doc_lengths
    }

    /// Rebuild statistics from persisted document lengths
    pub fn from_doc_lengths(doc_lengths: Vec<u32>) -> Self {
        Self {
            doc_count: doc_lengths.len() as u32,
            total_doc_length: doc_lengths.iter().map(|&l| l as u64).sum(),
            doc_lengths,
        }
    }
}

/// Robertson-Sparck-Jones IDF (always positive)
pub fn idf(df: u32, total_docs: u32) -> f32 {
    let n = total_docs as f32;
    let df = df as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 contribution of one term occurrence count in one document
pub fn bm25_score(
    tf: u32,
    df: u32,
    total_docs: u32,
    doc_len: u32,
    avgdl: f32,
    params: &Bm25Params,
) -> f32 {
    if total_docs == 0 || tf == 0 {
        return 0.0;
    }

    let tf = tf as f32;
    let norm = if avgdl > 0.0 {
        1.0 - params.b + params.b * (doc_len as f32 / avgdl)
    } else {
        1.0
    };

    idf(df, total_docs) * (tf * (params.k1 + 1.0)) / (tf + params.k1 * norm)
}

/// Length-normalized term frequency contribution
pub fn tf_normalized_score(tf: u32, doc_len: u32) -> f32 {
    if doc_len == 0 {
        return 0.0;
    }
    tf as f32 / doc_len as f32
}
