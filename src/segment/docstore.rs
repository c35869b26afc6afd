//! Stored fields: the per-document data a reader hands back with a hit

use serde::{Deserialize, Serialize};

use super::statistics::SegmentStatistics;
use crate::models::DocId;

/// Titles and analyzed lengths, indexed by doc id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredFields {
    titles: Vec<String>,
    doc_lengths: Vec<u32>,
}

impl StoredFields {
    pub fn new(titles: Vec<String>, stats: &SegmentStatistics) -> Self {
        Self {
            titles,
            doc_lengths: stats.doc_lengths().to_vec(),
        }
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.titles.get(doc_id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn from_bytes(data: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(data)
    }

    /// Split into titles and rebuilt statistics
    pub fn into_parts(self) -> (Vec<String>, SegmentStatistics) {
        (
            self.titles,
            SegmentStatistics::from_doc_lengths(self.doc_lengths),
        )
    }
}
