//! Ranked retrieval over a committed snapshot
//!
//! Candidates are gathered term-at-a-time from the postings of each query
//! term, scored with the index's scoring model, and the best `limit`
//! documents are kept in a bounded heap.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use super::parser::ParsedQuery;
use crate::config::IndexSettings;
use crate::error::{QuizdexError, Result};
use crate::models::{DocId, MatchMode, ScoringModel, SearchHit, SearchOptions};
use crate::segment::{bm25_score, tf_normalized_score, IndexReader};

/// Search with the default match mode and return at most `limit` hits
pub fn search(reader: &IndexReader, query_text: &str, limit: usize) -> Result<Vec<SearchHit>> {
    search_with(reader, query_text, &SearchOptions::new(limit))
}

/// Title of the single best-ranked document, if any document matches
pub fn top_title(reader: &IndexReader, query_text: &str) -> Result<Option<String>> {
    Ok(search(reader, query_text, 1)?
        .into_iter()
        .next()
        .map(|hit| hit.title))
}

/// Search with explicit options
///
/// Hits are ordered by descending score; equal scores are ordered by
/// ascending document id. An empty query or a zero limit yields no hits.
pub fn search_with(
    reader: &IndexReader,
    query_text: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchHit>> {
    let query = ParsedQuery::parse(reader.tokenizer(), query_text);
    if query.is_empty() || options.limit == 0 || reader.num_docs() == 0 {
        return Ok(Vec::new());
    }

    let accumulators = score_candidates(reader, &query)?;
    let required = match options.match_mode {
        MatchMode::Any => 1,
        MatchMode::All => query.len(),
    };

    let capacity = options.limit.min(accumulators.len()).saturating_add(1);
    let mut heap: BinaryHeap<ScoredDoc> = BinaryHeap::with_capacity(capacity);
    for (doc_id, acc) in accumulators {
        if acc.matched_terms < required {
            continue;
        }
        let candidate = ScoredDoc {
            doc_id,
            score: acc.score,
        };
        if heap.len() < options.limit {
            heap.push(candidate);
        } else if let Some(worst) = heap.peek() {
            if candidate < *worst {
                heap.pop();
                heap.push(candidate);
            }
        }
    }

    let hits = heap
        .into_sorted_vec()
        .into_iter()
        .map(|scored| {
            let title = reader.title(scored.doc_id).ok_or_else(|| {
                QuizdexError::CorruptIndex(format!(
                    "posting references unknown document {}",
                    scored.doc_id
                ))
            })?;
            Ok(SearchHit {
                doc_id: scored.doc_id,
                title: title.to_string(),
                score: scored.score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        terms = query.len(),
        hits = hits.len(),
        generation = reader.generation().0,
        "executed query"
    );
    Ok(hits)
}

#[derive(Default)]
struct Accumulator {
    score: f32,
    matched_terms: usize,
}

fn score_candidates(
    reader: &IndexReader,
    query: &ParsedQuery,
) -> Result<HashMap<DocId, Accumulator>> {
    let segment = reader.segment();
    let settings: &IndexSettings = reader.settings();
    let total_docs = reader.num_docs();
    let avgdl = reader.avg_doc_len() as f32;

    let mut accumulators: HashMap<DocId, Accumulator> = HashMap::new();
    for query_term in query.terms() {
        let postings = segment
            .get_postings(&query_term.term)
            .map_err(|e| QuizdexError::CorruptIndex(e.to_string()))?;
        let Some(postings) = postings else {
            continue;
        };

        let df = postings.len() as u32;
        let query_tf = query_term.frequency as f32;
        for posting in postings {
            let doc_len = segment.doc_length(posting.doc_id).ok_or_else(|| {
                QuizdexError::CorruptIndex(format!(
                    "no length stored for document {}",
                    posting.doc_id
                ))
            })?;

            let contribution = match settings.scoring {
                ScoringModel::TfNormalized => {
                    tf_normalized_score(posting.term_frequency, doc_len)
                }
                ScoringModel::Bm25 => bm25_score(
                    posting.term_frequency,
                    df,
                    total_docs,
                    doc_len,
                    avgdl,
                    &settings.bm25,
                ),
            };

            let acc = accumulators.entry(posting.doc_id).or_default();
            acc.score += query_tf * contribution;
            acc.matched_terms += 1;
        }
    }
    Ok(accumulators)
}

/// Heap entry ordered so that the worst-ranked document is the greatest
#[derive(Clone, Copy, Debug)]
struct ScoredDoc {
    doc_id: DocId,
    score: f32,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score ranks first, then lower doc id
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndexSettings, TokenizerConfig};
    use crate::segment::Index;

    fn index_with(settings: IndexSettings, docs: &[(&str, &str)]) -> Index {
        let index = Index::in_memory(settings);
        let mut writer = index.writer().unwrap();
        for (title, content) in docs {
            writer.add_document(title, content).unwrap();
        }
        writer.commit().unwrap();
        index
    }

    fn capitals(settings: IndexSettings) -> Index {
        index_with(
            settings,
            &[
                ("Paris", "Paris is the capital of France"),
                ("Berlin", "Berlin is the capital of Germany"),
                ("Ocean", "The Pacific is the largest ocean"),
            ],
        )
    }

    #[test]
    fn test_capital_queries_rank_expected_titles() {
        for scoring in [ScoringModel::Bm25, ScoringModel::TfNormalized] {
            let index = capitals(IndexSettings::default().with_scoring(scoring));
            let reader = index.reader().unwrap();

            assert_eq!(
                top_title(&reader, "capital of France").unwrap().as_deref(),
                Some("Paris")
            );
            assert_eq!(
                top_title(&reader, "German capital city Berlin").unwrap().as_deref(),
                Some("Berlin")
            );
            assert_eq!(
                top_title(&reader, "largest ocean").unwrap().as_deref(),
                Some("Ocean")
            );
        }
    }

    #[test]
    fn test_empty_query_and_zero_limit() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();

        assert!(search(&reader, "", 10).unwrap().is_empty());
        assert!(search(&reader, "!!! ...", 10).unwrap().is_empty());
        assert!(search(&reader, "capital", 0).unwrap().is_empty());
        assert_eq!(top_title(&reader, "zebra").unwrap(), None);
    }

    #[test]
    fn test_limit_and_ordering() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();

        let hits = search(&reader, "capital", 10).unwrap();
        assert_eq!(hits.len(), 2);
        // Equal-length documents with tf=1 score identically; lower id first
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].title, "Paris");
        assert_eq!(hits[1].title, "Berlin");

        let hits = search(&reader, "the", 10).unwrap();
        assert_eq!(hits.len(), 3);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        assert_eq!(search(&reader, "the", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_unbounded_limit_returns_every_match() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();

        let hits = search(&reader, "capital", usize::MAX).unwrap();
        assert_eq!(hits.len(), 2);
        let hits = search(&reader, "the", usize::MAX / 2).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_long_term_is_retrievable() {
        let long = "a".repeat(65);
        let index = index_with(
            IndexSettings::default(),
            &[("Long", &format!("sequence {}", long)), ("Other", "sequence")],
        );
        let reader = index.reader().unwrap();

        let hits = search(&reader, &long, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Long");
    }

    #[test]
    fn test_match_all_requires_every_term() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();

        let any = search_with(&reader, "capital germany", &SearchOptions::new(10)).unwrap();
        assert_eq!(any.len(), 2);

        let all = search_with(
            &reader,
            "capital germany",
            &SearchOptions::new(10).with_match_mode(MatchMode::All),
        )
        .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Berlin");

        let none = search_with(
            &reader,
            "capital zebra",
            &SearchOptions::new(10).with_match_mode(MatchMode::All),
        )
        .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_length_normalization() {
        let index = index_with(
            IndexSettings::default().with_scoring(ScoringModel::TfNormalized),
            &[
                ("Long", "rust is a language with many words in this document"),
                ("Short", "rust language"),
            ],
        );
        let reader = index.reader().unwrap();
        let hits = search(&reader, "rust", 10).unwrap();
        assert_eq!(hits[0].title, "Short");
        assert!((hits[0].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_query_term_repetition_weights_score() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();

        let once = search(&reader, "france", 1).unwrap();
        let twice = search(&reader, "france france", 1).unwrap();
        assert!((twice[0].score - 2.0 * once[0].score).abs() < 1e-5);
    }

    #[test]
    fn test_search_is_deterministic() {
        let index = capitals(IndexSettings::default());
        let reader = index.reader().unwrap();
        let first = search(&reader, "the capital of the ocean", 10).unwrap();
        for _ in 0..5 {
            assert_eq!(search(&reader, "the capital of the ocean", 10).unwrap(), first);
        }
    }

    #[test]
    fn test_stemming_applies_to_queries() {
        let settings = IndexSettings::default().with_tokenizer(TokenizerConfig {
            stem: true,
            ..Default::default()
        });
        let index = index_with(
            settings,
            &[("Runner", "she runs every morning"), ("Other", "nothing here")],
        );
        let reader = index.reader().unwrap();
        assert_eq!(top_title(&reader, "running").unwrap().as_deref(), Some("Runner"));
    }

    #[test]
    fn test_zero_length_document_never_matches() {
        let index = index_with(
            IndexSettings::default(),
            &[("Empty", ""), ("Full", "alpha beta")],
        );
        let reader = index.reader().unwrap();
        let hits = search(&reader, "alpha beta", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Full");
    }
}
