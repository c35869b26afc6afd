//! Immutable segment reader
//!
//! A committed generation is loaded fully into memory; a reader never
//! touches the filesystem after construction.

use std::io;

use serde::{Deserialize, Serialize};

use super::postings::PostingsReader;
use super::statistics::SegmentStatistics;
use super::term_dict::TermDictionary;
use super::types::{Generation, Posting};
use crate::models::DocId;

/// Metadata for a segment stored in the manifest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentMeta {
    pub generation: Generation,
    pub doc_count: u32,
    pub term_count: u32,
    /// Size in bytes (all segment files combined)
    pub size_bytes: u64,
    /// Creation timestamp (Unix seconds)
    pub created_at: u64,
}

/// Immutable view of one committed generation
pub struct SegmentReader {
    meta: SegmentMeta,
    terms: TermDictionary,
    postings: PostingsReader,
    stats: SegmentStatistics,
    titles: Vec<String>,
}

impl SegmentReader {
    /// Create a segment reader from in-memory data
    pub fn from_memory(
        meta: SegmentMeta,
        terms: TermDictionary,
        postings: PostingsReader,
        stats: SegmentStatistics,
        titles: Vec<String>,
    ) -> io::Result<Self> {
        if titles.len() != stats.doc_count as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} titles stored for {} documents",
                    titles.len(),
                    stats.doc_count
                ),
            ));
        }
        Ok(Self {
            meta,
            terms,
            postings,
            stats,
            titles,
        })
    }

    pub fn meta(&self) -> &SegmentMeta {
        &self.meta
    }

    pub fn generation(&self) -> Generation {
        self.meta.generation
    }

    pub fn doc_count(&self) -> u32 {
        self.stats.doc_count
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &TermDictionary {
        &self.terms
    }

    pub fn stats(&self) -> &SegmentStatistics {
        &self.stats
    }

    /// Number of documents containing `term` (0 if absent)
    pub fn doc_frequency(&self, term: &str) -> u32 {
        self.terms.get(term).map(|m| m.doc_frequency).unwrap_or(0)
    }

    /// Postings for `term`, sorted by doc id; `None` if the term is absent
    pub fn get_postings(&self, term: &str) -> io::Result<Option<Vec<Posting>>> {
        match self.terms.get(term) {
            Some(meta) => self.postings.get_postings(meta).map(Some),
            None => Ok(None),
        }
    }

    pub fn doc_length(&self, doc_id: DocId) -> Option<u32> {
        self.stats.doc_length(doc_id)
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.titles.get(doc_id as usize).map(String::as_str)
    }
}
