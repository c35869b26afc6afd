//! Free-text query analysis and ranked retrieval
//!
//! Query text goes through the snapshot's own tokenizer, so queries are
//! always analyzed exactly like the documents they are matched against.

pub mod executor;
pub mod parser;

pub use executor::{search, search_with, top_title};
pub use parser::{ParsedQuery, QueryTerm};
