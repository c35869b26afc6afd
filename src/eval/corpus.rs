//! Wiki-subset corpus reader
//!
//! A corpus file holds one or more pages. Each page starts with a
//! `[[Title]]` line followed by its content lines.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{QuizdexError, Result};
use crate::models::Document;

/// Read every page from the regular files of `dir`, in file name order
///
/// Hidden files and subdirectories are skipped.
pub fn read_corpus<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry.file_type()?.is_file() {
            debug!(path = %entry.path().display(), "skipping corpus entry");
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    let mut documents = Vec::new();
    for path in &files {
        let text = fs::read_to_string(path)?;
        documents.extend(parse_pages(&text, path)?);
    }
    debug!(
        files = files.len(),
        documents = documents.len(),
        "read corpus"
    );
    Ok(documents)
}

enum ParseState {
    BeforeFirstTitle,
    InPage { title: String, lines: Vec<String> },
}

/// Parse the pages of one corpus file; `path` is only used in error messages
pub fn parse_pages(text: &str, path: &Path) -> Result<Vec<Document>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut pages = Vec::new();
    let mut state = ParseState::BeforeFirstTitle;

    for (index, line) in text.lines().enumerate() {
        if let Some(title) = title_marker(line) {
            if let ParseState::InPage { title: previous, lines } = state {
                pages.push(finish_page(previous, lines));
            }
            state = ParseState::InPage {
                title: title.to_string(),
                lines: Vec::new(),
            };
            continue;
        }

        match &mut state {
            ParseState::BeforeFirstTitle if line.trim().is_empty() => {}
            ParseState::BeforeFirstTitle => {
                return Err(QuizdexError::format(
                    path,
                    index + 1,
                    "content before the first [[Title]] line",
                ));
            }
            ParseState::InPage { lines, .. } => lines.push(line.to_string()),
        }
    }

    if let ParseState::InPage { title, lines } = state {
        pages.push(finish_page(title, lines));
    }
    Ok(pages)
}

/// Title inside a `[[...]]` line, trimmed
fn title_marker(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("[[")?
        .strip_suffix("]]")
        .map(str::trim)
}

fn finish_page(title: String, lines: Vec<String>) -> Document {
    Document::new(title, lines.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> Result<Vec<Document>> {
        parse_pages(text, Path::new("pages.txt"))
    }

    #[test]
    fn test_single_page() {
        let pages = parse("[[Paris]]\nParis is the capital of France.\nIt is on the Seine.\n").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Paris");
        assert_eq!(
            pages[0].content,
            "Paris is the capital of France.\nIt is on the Seine."
        );
    }

    #[test]
    fn test_multiple_pages_and_blank_lines() {
        let text = "\n\n[[Paris]]\nFrance\n\n[[ Berlin ]]\n\nGermany\n\n[[Empty]]\n";
        let pages = parse(text).unwrap();

        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Paris", "Berlin", "Empty"]);
        assert_eq!(pages[0].content, "France");
        assert_eq!(pages[1].content, "Germany");
        assert_eq!(pages[2].content, "");
    }

    #[test]
    fn test_bom_is_stripped() {
        let pages = parse("\u{feff}[[Tokyo]]\nJapan").unwrap();
        assert_eq!(pages[0].title, "Tokyo");
    }

    #[test]
    fn test_text_before_title_is_rejected() {
        let err = parse("\nstray line\n[[Paris]]\nFrance\n").unwrap_err();
        assert!(matches!(err, QuizdexError::Format { line: 2, .. }));
    }

    #[test]
    fn test_empty_title_is_passed_through() {
        let pages = parse("[[]]\ncontent").unwrap();
        assert_eq!(pages[0].title, "");
    }

    #[test]
    fn test_read_corpus_sorted_and_skips_hidden() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "[[Berlin]]\nGermany").unwrap();
        fs::write(tmp.path().join("a.txt"), "[[Paris]]\nFrance\n[[Lyon]]\nFrance").unwrap();
        fs::write(tmp.path().join(".hidden"), "not a page").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();

        let docs = read_corpus(tmp.path()).unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Paris", "Lyon", "Berlin"]);
    }

    #[test]
    fn test_missing_corpus_dir() {
        let tmp = TempDir::new().unwrap();
        let err = read_corpus(tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, QuizdexError::Io(_)));
    }
}
