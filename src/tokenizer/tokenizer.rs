use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};

use crate::config::TokenizerConfig;

/// Text analyzer: lowercasing, splitting on non-alphanumeric runs, and
/// optional stopword removal and stemming.
///
/// The same `Tokenizer` configuration must be used when building an index and
/// when querying it; the index persists its configuration for that reason.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize text into a vector of terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        // Lowercase before splitting: lowercasing can change character classes,
        // and tokens must be stable under re-analysis.
        let lowered;
        let text = if self.config.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter(|word| {
                let len = word.chars().count();
                len >= self.config.min_token_length
                    && self.config.max_token_length.map_or(true, |max| len <= max)
            })
            .filter(|word| !self.stopwords.contains(*word))
            .map(|word| match &self.stemmer {
                Some(stemmer) => stemmer.stem(word).into_owned(),
                None => word.to_string(),
            })
            .collect()
    }

    /// Compute term frequencies for a tokenized document
    pub fn compute_term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut freq = HashMap::new();
        for token in self.tokenize(text) {
            *freq.entry(token).or_insert(0) += 1;
        }
        freq
    }

    /// Get unique terms from text
    pub fn unique_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

/// Analyze text with the default configuration
pub fn analyze(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

/// Render analyzed terms back into text that re-analyzes to the same terms
pub fn analyze_to_text(terms: &[String]) -> String {
    terms.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config() -> TokenizerConfig {
        TokenizerConfig::default()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = analyze("Paris is the capital of France!");
        assert_eq!(tokens, vec!["paris", "is", "the", "capital", "of", "france"]);
    }

    #[test]
    fn test_splits_on_punctuation_runs() {
        let tokens = analyze("--rock'n'roll... (1950s)/jazz");
        assert_eq!(tokens, vec!["rock", "n", "roll", "1950s", "jazz"]);
    }

    #[test]
    fn test_empty_and_separator_only_input() {
        assert!(analyze("").is_empty());
        assert!(analyze("  ,;:!? -- ").is_empty());
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        let tokens = analyze("Über Zürich café");
        assert_eq!(tokens, vec!["über", "zürich", "café"]);
    }

    #[test]
    fn test_no_lowercase() {
        let config = TokenizerConfig {
            lowercase: false,
            ..plain_config()
        };
        let tokenizer = Tokenizer::new(&config);
        assert_eq!(tokenizer.tokenize("Hello World"), vec!["Hello", "World"]);
    }

    #[test]
    fn test_stopword_removal() {
        let config = TokenizerConfig {
            remove_stopwords: true,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("This is a document about the system");

        assert!(!tokens.contains(&"this".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"document".to_string()));
    }

    #[test]
    fn test_stemming() {
        let config = TokenizerConfig {
            stem: true,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("running runs");

        assert_eq!(tokens, vec!["run", "run"]);
    }

    #[test]
    fn test_term_frequencies() {
        let tokenizer = Tokenizer::default();

        let freq = tokenizer.compute_term_frequencies("apple Apple banana");
        assert_eq!(freq.get("apple"), Some(&2));
        assert_eq!(freq.get("banana"), Some(&1));
        assert_eq!(tokenizer.unique_terms("apple Apple banana").len(), 2);
    }

    #[test]
    fn test_long_tokens_kept_by_default() {
        let long = "a".repeat(65);
        assert_eq!(analyze(&long), vec![long.clone()]);

        let text = format!("sequence {}", "x".repeat(300));
        assert_eq!(analyze(&text).len(), 2);
    }

    #[test]
    fn test_min_max_token_length() {
        let config = TokenizerConfig {
            min_token_length: 3,
            max_token_length: Some(5),
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("a ab abc abcd abcde abcdef");

        assert_eq!(tokens, vec!["abc", "abcd", "abcde"]);
    }

    #[test]
    fn test_reanalysis_is_stable() {
        let terms = analyze("The Eiffel-Tower, built 1889.");
        assert_eq!(analyze(&analyze_to_text(&terms)), terms);
    }
}
