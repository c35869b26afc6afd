//! In-memory batch of documents awaiting commit
//!
//! The batch is owned by a single `IndexWriter`; nothing in it is visible to
//! readers until the writer commits it as a new generation.

use std::collections::HashMap;

use super::statistics::SegmentStatistics;
use super::types::Posting;
use crate::models::DocId;

/// Pending postings, titles and statistics for one write batch
#[derive(Debug, Default)]
pub struct PendingBatch {
    /// Term to postings mapping (postings in ascending doc id order)
    terms: HashMap<String, Vec<Posting>>,
    /// Stored title per doc id
    titles: Vec<String>,
    stats: SegmentStatistics,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an analyzed document to the batch
    ///
    /// Returns the doc id assigned to it. Ids are dense and follow insertion
    /// order, so every postings list stays sorted.
    pub fn index_document(
        &mut self,
        title: String,
        term_frequencies: HashMap<String, u32>,
        doc_len: u32,
    ) -> DocId {
        let doc_id = self.stats.add_document(doc_len);
        self.titles.push(title);

        for (term, tf) in term_frequencies {
            self.terms
                .entry(term)
                .or_default()
                .push(Posting::new(doc_id, tf));
        }

        doc_id
    }

    pub fn get_postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub fn all_postings(&self) -> &HashMap<String, Vec<Posting>> {
        &self.terms
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn stats(&self) -> &SegmentStatistics {
        &self.stats
    }

    pub fn doc_count(&self) -> u32 {
        self.stats.doc_count
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
