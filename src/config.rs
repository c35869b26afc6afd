use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::{MatchMode, ScoringModel};

/// Index settings configuration
///
/// Persisted in the manifest of every committed generation, so a reader
/// analyzes and scores queries exactly the way the index was built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub tokenizer_config: TokenizerConfig,
    pub scoring: ScoringModel,
    pub bm25: Bm25Params,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            tokenizer_config: TokenizerConfig::default(),
            scoring: ScoringModel::Bm25,
            bm25: Bm25Params::default(),
        }
    }
}

impl IndexSettings {
    pub fn with_tokenizer(mut self, tokenizer_config: TokenizerConfig) -> Self {
        self.tokenizer_config = tokenizer_config;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringModel) -> Self {
        self.scoring = scoring;
        self
    }
}

/// Tokenizer configuration
///
/// The default is the plain analyzer: lowercase, split on non-alphanumeric
/// runs, keep every non-empty token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    /// Minimum token length in characters
    pub min_token_length: usize,
    /// Maximum token length in characters; unbounded when `None`
    pub max_token_length: Option<usize>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: false,
            stem: false,
            min_token_length: 1,
            max_token_length: None,
        }
    }
}

/// BM25 parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term frequency saturation parameter
    pub k1: f32,
    /// Length normalization parameter
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// Configuration for one evaluation run
#[derive(Clone, Debug)]
pub struct EvalConfig {
    pub questions_path: PathBuf,
    pub corpus_dir: PathBuf,
    /// Index directory; `None` builds the index in memory
    pub index_dir: Option<PathBuf>,
    pub settings: IndexSettings,
    pub match_mode: MatchMode,
    /// Append the clue's category to the query text
    pub include_category: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("data/questions.txt"),
            corpus_dir: PathBuf::from("data/wiki-subset"),
            index_dir: Some(PathBuf::from("index_directory")),
            settings: IndexSettings::default(),
            match_mode: MatchMode::Any,
            include_category: true,
        }
    }
}

impl EvalConfig {
    pub fn new(questions_path: PathBuf, corpus_dir: PathBuf) -> Self {
        Self {
            questions_path,
            corpus_dir,
            ..Default::default()
        }
    }

    pub fn with_index_dir(mut self, index_dir: Option<PathBuf>) -> Self {
        self.index_dir = index_dir;
        self
    }

    pub fn with_settings(mut self, settings: IndexSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_category(mut self, include_category: bool) -> Self {
        self.include_category = include_category;
        self
    }
}
