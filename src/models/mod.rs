pub mod document;
pub mod search;

pub use document::{DocId, Document};
pub use search::{MatchMode, ScoringModel, SearchHit, SearchOptions};
