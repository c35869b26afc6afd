//! Free-text query analysis

use crate::tokenizer::Tokenizer;

/// A distinct analyzed query term with its multiplicity in the query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTerm {
    pub term: String,
    pub frequency: u32,
}

/// Analyzed query: distinct terms in first-appearance order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    terms: Vec<QueryTerm>,
}

impl ParsedQuery {
    /// Analyze `text` with the same tokenizer the index was built with
    pub fn parse(tokenizer: &Tokenizer, text: &str) -> Self {
        let mut terms: Vec<QueryTerm> = Vec::new();
        for token in tokenizer.tokenize(text) {
            match terms.iter_mut().find(|t| t.term == token) {
                Some(existing) => existing.frequency += 1,
                None => terms.push(QueryTerm {
                    term: token,
                    frequency: 1,
                }),
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
