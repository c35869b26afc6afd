//! Trivia retrieval evaluation harness

pub mod clues;
pub mod corpus;
pub mod metrics;
pub mod runner;

pub use clues::{parse_clues, read_clues, Clue};
pub use corpus::{parse_pages, read_corpus};
pub use metrics::{precision_at_1, EvaluationReport, Outcome};
pub use runner::{build_index, evaluate, evaluate_documents, run, Evaluation};
