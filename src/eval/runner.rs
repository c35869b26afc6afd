//! End-to-end evaluation: parse inputs, build the index, answer every clue

use tracing::{debug, info};

use super::clues::{read_clues, Clue};
use super::corpus::read_corpus;
use super::metrics::{EvaluationReport, Outcome};
use crate::config::{EvalConfig, IndexSettings};
use crate::error::Result;
use crate::models::{Document, SearchOptions};
use crate::query::search_with;
use crate::segment::{Index, IndexReader};

/// Outcomes of a full evaluation run plus their summary
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub outcomes: Vec<Outcome>,
    pub report: EvaluationReport,
}

/// Run the whole pipeline described by `config`
///
/// Both input files are parsed before any index is created, so malformed
/// input never leaves an index directory behind.
pub fn run(config: &EvalConfig) -> Result<Evaluation> {
    let clues = read_clues(&config.questions_path)?;
    let documents = read_corpus(&config.corpus_dir)?;
    info!(
        clues = clues.len(),
        documents = documents.len(),
        "parsed evaluation inputs"
    );

    let index = build_index(&documents, config)?;
    let reader = index.reader()?;
    let outcomes = evaluate(&reader, &clues, config)?;
    let report = EvaluationReport::from_outcomes(&outcomes);

    info!(
        correct = report.correct,
        total = report.total,
        unanswered = report.unanswered,
        precision_at_1 = report.precision_at_1,
        "evaluation finished"
    );
    Ok(Evaluation { outcomes, report })
}

/// Build and commit an index over `documents`
pub fn build_index(documents: &[Document], config: &EvalConfig) -> Result<Index> {
    let index = match &config.index_dir {
        Some(dir) => Index::create(dir, config.settings.clone())?,
        None => Index::in_memory(config.settings.clone()),
    };
    index_documents(&index, documents)?;
    Ok(index)
}

fn index_documents(index: &Index, documents: &[Document]) -> Result<()> {
    let mut writer = index.writer()?;
    for document in documents {
        writer.add(document)?;
    }
    writer.commit()?;
    Ok(())
}

/// Answer every clue against `reader` with the top-ranked title
pub fn evaluate(reader: &IndexReader, clues: &[Clue], config: &EvalConfig) -> Result<Vec<Outcome>> {
    let options = SearchOptions::new(1).with_match_mode(config.match_mode);

    clues
        .iter()
        .enumerate()
        .map(|(i, clue)| {
            let query = clue.query_text(config.include_category);
            let retrieved = search_with(reader, &query, &options)?
                .into_iter()
                .next()
                .map(|hit| hit.title);
            debug!(clue = i, retrieved = ?retrieved, "answered clue");

            Ok(Outcome {
                clue: clue.clue.clone(),
                answer: clue.answer.clone(),
                retrieved,
            })
        })
        .collect()
}

/// In-memory convenience used by tests and benchmarks
pub fn evaluate_documents(
    documents: &[Document],
    clues: &[Clue],
    settings: IndexSettings,
) -> Result<Evaluation> {
    let config = EvalConfig::default()
        .with_index_dir(None)
        .with_settings(settings);
    let index = build_index(documents, &config)?;
    let outcomes = evaluate(&index.reader()?, clues, &config)?;
    let report = EvaluationReport::from_outcomes(&outcomes);
    Ok(Evaluation { outcomes, report })
}
