use proptest::prelude::*;
use quizdex::tokenizer::{analyze, analyze_to_text, Tokenizer};
use quizdex::TokenizerConfig;

const TEXT: &str = "[a-zA-Z0-9àéîöüßÀÉÎÖÜ ,.;:!?'\"()\\-\n\t]{0,200}";

proptest! {
    #[test]
    fn analysis_is_idempotent(s in TEXT) {
        let terms = analyze(&s);
        let again = analyze(&analyze_to_text(&terms));
        prop_assert_eq!(again, terms);
    }

    #[test]
    fn terms_are_lowercase_alphanumeric(s in TEXT) {
        for term in analyze(&s) {
            prop_assert!(!term.is_empty());
            prop_assert!(term.chars().all(char::is_alphanumeric), "term {:?}", term);
            prop_assert_eq!(term.to_lowercase(), term.clone());
        }
    }

    #[test]
    fn analysis_is_deterministic(s in TEXT) {
        prop_assert_eq!(analyze(&s), analyze(&s));
    }

    #[test]
    fn stopword_removal_only_drops_terms(s in TEXT) {
        let plain = analyze(&s);
        let filtered = Tokenizer::new(&TokenizerConfig {
            remove_stopwords: true,
            ..Default::default()
        })
        .tokenize(&s);

        prop_assert!(filtered.len() <= plain.len());
        let mut rest = plain.iter();
        for term in &filtered {
            prop_assert!(rest.any(|t| t == term), "{:?} not in order", term);
        }
    }

    #[test]
    fn term_frequencies_sum_to_term_count(s in TEXT) {
        let tokenizer = Tokenizer::default();
        let total: u32 = tokenizer.compute_term_frequencies(&s).values().sum();
        prop_assert_eq!(total as usize, tokenizer.tokenize(&s).len());
    }
}
