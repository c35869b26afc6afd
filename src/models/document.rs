use serde::{Deserialize, Serialize};

/// Dense document identifier, assigned in insertion order within a generation
pub type DocId = u32;

/// A reference document as handed to the index writer
///
/// Only the title is stored; the content is analyzed and then dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
