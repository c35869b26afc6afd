//! Core types for the segment-based index

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DocId;

/// Commit generation (monotonically increasing per index directory)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub const FIRST: Generation = Generation(1);

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Directory name holding this generation's segment files
    pub fn dir_name(&self) -> String {
        format!("gen_{:06}", self.0)
    }

    /// Parse a directory name produced by [`Generation::dir_name`]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        name.strip_prefix("gen_")?.parse().ok().map(Self)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generation {}", self.0)
    }
}

/// A single posting (document + term frequency)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, term_frequency: u32) -> Self {
        Self {
            doc_id,
            term_frequency,
        }
    }
}

/// Block size for postings compression
pub const BLOCK_SIZE: usize = 128;

/// Metadata for a posting list, stored in the term dictionary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingListMeta {
    /// Offset in the postings file
    pub offset: u64,
    /// Length in bytes
    pub length: u64,
    /// Document frequency (number of documents containing this term)
    pub doc_frequency: u32,
    /// Total term frequency across all documents
    pub total_term_frequency: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_dir_names() {
        let gen = Generation::new(42);
        assert_eq!(gen.dir_name(), "gen_000042");
        assert_eq!(Generation::from_dir_name("gen_000042"), Some(gen));
        assert_eq!(Generation::from_dir_name("gen_x"), None);
        assert_eq!(Generation::from_dir_name("index.manifest"), None);
        assert_eq!(Generation::FIRST.next(), Generation::new(2));
    }
}
