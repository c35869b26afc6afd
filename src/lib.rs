pub mod config;
pub mod error;
pub mod eval;
pub mod models;
pub mod query;
pub mod segment;
pub mod tokenizer;

pub use config::{Bm25Params, EvalConfig, IndexSettings, TokenizerConfig};
pub use error::{QuizdexError, Result};
pub use models::*;
pub use segment::{Generation, Index, IndexReader, IndexWriter};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
