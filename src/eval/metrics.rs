//! Retrieval accuracy metrics

use serde::{Deserialize, Serialize};

/// Result of evaluating one clue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub clue: String,
    pub answer: String,
    /// Title of the top-ranked document; `None` when nothing matched
    pub retrieved: Option<String>,
}

impl Outcome {
    /// Exact title match against the expected answer
    pub fn is_correct(&self) -> bool {
        self.retrieved.as_deref() == Some(self.answer.as_str())
    }
}

/// Fraction of outcomes whose top result is the expected answer
///
/// Unanswered clues count as incorrect and stay in the denominator.
/// Returns 0.0 for no outcomes.
pub fn precision_at_1(outcomes: &[Outcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let correct = outcomes.iter().filter(|o| o.is_correct()).count();
    correct as f64 / outcomes.len() as f64
}

/// Summary of an evaluation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    pub unanswered: usize,
    pub precision_at_1: f64,
}

impl EvaluationReport {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        Self {
            total: outcomes.len(),
            correct: outcomes.iter().filter(|o| o.is_correct()).count(),
            unanswered: outcomes.iter().filter(|o| o.retrieved.is_none()).count(),
            precision_at_1: precision_at_1(outcomes),
        }
    }

    /// Precision over answered clues only
    pub fn answered_precision(&self) -> f64 {
        let answered = self.total - self.unanswered;
        if answered == 0 {
            0.0
        } else {
            self.correct as f64 / answered as f64
        }
    }
}
