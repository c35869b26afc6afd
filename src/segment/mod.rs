//! Generation-based inverted index for full-text search
//!
//! Every commit builds one immutable segment from the writer's pending
//! batch and publishes it as a new generation.
//!
//! # Architecture
//!
//! - `PendingBatch`: in-memory postings accumulated by the writer
//! - `SegmentWriter`: encodes a batch into postings, FST dictionary and stored fields
//! - `SegmentReader`: immutable, fully loaded view of one generation
//! - `SegmentStore`: generation directories and the atomically replaced manifest
//! - `Index`: single writer, snapshot readers, commit/reload

mod types;
mod statistics;
mod buffer;
mod postings;
mod term_dict;
mod docstore;
mod reader;
mod writer;
mod manifest;
mod store;
mod index;

pub use types::*;
pub use statistics::*;
pub use buffer::*;
pub use postings::*;
pub use term_dict::*;
pub use docstore::*;
pub use reader::*;
pub use writer::*;
pub use manifest::*;
pub use store::*;
pub use index::*;
