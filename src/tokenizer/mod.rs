//! Text analysis shared by indexing and querying

mod tokenizer;

pub use tokenizer::{analyze, analyze_to_text, Tokenizer};
