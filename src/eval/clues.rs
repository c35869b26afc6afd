//! Trivia clue file parsing
//!
//! Records are four lines each: category, clue, answer, blank separator.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizdexError, Result};

const LINES_PER_RECORD: usize = 4;

/// One trivia record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub category: String,
    pub clue: String,
    pub answer: String,
}

impl Clue {
    /// Query text for this clue, optionally followed by its category
    pub fn query_text(&self, include_category: bool) -> String {
        if include_category {
            format!("{} {}", self.clue, self.category)
        } else {
            self.clue.clone()
        }
    }
}

/// Read and parse a clue file
pub fn read_clues<P: AsRef<Path>>(path: P) -> Result<Vec<Clue>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_clues(&text, path)
}

/// Parse clue records; `path` is only used in error messages
pub fn parse_clues(text: &str, path: &Path) -> Result<Vec<Clue>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    if lines.len() % LINES_PER_RECORD != 0 {
        return Err(QuizdexError::format(
            path,
            lines.len(),
            format!(
                "{} lines is not a whole number of {}-line records",
                lines.len(),
                LINES_PER_RECORD
            ),
        ));
    }

    let mut clues = Vec::with_capacity(lines.len() / LINES_PER_RECORD);
    for (index, record) in lines.chunks(LINES_PER_RECORD).enumerate() {
        let first_line = index * LINES_PER_RECORD + 1;
        let field = |offset: usize, name: &str| -> Result<String> {
            let value = record[offset];
            if value.is_empty() {
                Err(QuizdexError::format(
                    path,
                    first_line + offset,
                    format!("empty {}", name),
                ))
            } else {
                Ok(value.to_string())
            }
        };

        let clue = Clue {
            category: field(0, "category")?,
            clue: field(1, "clue")?,
            answer: field(2, "answer")?,
        };
        if !record[3].is_empty() {
            return Err(QuizdexError::format(
                path,
                first_line + 3,
                "expected a blank separator line",
            ));
        }
        clues.push(clue);
    }
    Ok(clues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Clue>> {
        parse_clues(text, Path::new("questions.txt"))
    }

    #[test]
    fn test_parse_records() {
        let text = "GEOGRAPHY\nCity of light  \nParis\n\n  CAPITALS\nOn the Spree\nBerlin\n\n";
        let clues = parse(text).unwrap();

        assert_eq!(clues.len(), 2);
        assert_eq!(clues[0].category, "GEOGRAPHY");
        assert_eq!(clues[0].clue, "City of light");
        assert_eq!(clues[1].category, "CAPITALS");
        assert_eq!(clues[1].answer, "Berlin");
    }

    #[test]
    fn test_crlf_and_bom() {
        let text = "\u{feff}CAT\r\nClue\r\nAnswer\r\n\r\n";
        let clues = parse(text).unwrap();
        assert_eq!(clues[0].category, "CAT");
        assert_eq!(clues[0].answer, "Answer");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_incomplete_record() {
        let err = parse("CAT\nClue\nAnswer\n\nCAT2\nClue2\n").unwrap_err();
        match err {
            QuizdexError::Format { line, .. } => assert_eq!(line, 6),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_field_reports_line() {
        let err = parse("CAT\nClue\nAnswer\n\nCAT2\n\nAnswer2\n\n").unwrap_err();
        match err {
            QuizdexError::Format { line, message, .. } => {
                assert_eq!(line, 6);
                assert!(message.contains("clue"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_blank_separator() {
        let err = parse("CAT\nClue\nAnswer\nextra\n").unwrap_err();
        assert!(matches!(err, QuizdexError::Format { line: 4, .. }));
    }

    #[test]
    fn test_query_text() {
        let clue = Clue {
            category: "SCIENCE".into(),
            clue: "Largest planet".into(),
            answer: "Jupiter".into(),
        };
        assert_eq!(clue.query_text(true), "Largest planet SCIENCE");
        assert_eq!(clue.query_text(false), "Largest planet");
    }
}
