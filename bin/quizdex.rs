use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quizdex::eval::{run, Evaluation};
use quizdex::{EvalConfig, IndexSettings, MatchMode, ScoringModel, TokenizerConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "quizdex")]
#[command(about = "Answer trivia clues by retrieving wiki page titles and report precision@1", long_about = None)]
struct Args {
    /// Clue file: category, clue, answer and a blank line per record
    #[arg(long, env = "QUIZDEX_QUESTIONS", default_value = "data/questions.txt")]
    questions: PathBuf,

    /// Directory of wiki pages, each starting with a [[Title]] line
    #[arg(long, env = "QUIZDEX_CORPUS", default_value = "data/wiki-subset")]
    corpus: PathBuf,

    /// Where the index is built (recreated on every run)
    #[arg(long, env = "QUIZDEX_INDEX_DIR", default_value = "index_directory")]
    index_dir: PathBuf,

    /// Ranking function
    #[arg(long, value_enum, default_value_t = Scoring::Bm25)]
    scoring: Scoring,

    /// Whether a page must contain any or all of the query terms
    #[arg(long, value_enum, default_value_t = Matching::Any)]
    match_mode: Matching,

    /// Drop English stop words at index and query time
    #[arg(long)]
    remove_stopwords: bool,

    /// Apply English stemming at index and query time
    #[arg(long)]
    stem: bool,

    /// Query with the clue text only, without its category
    #[arg(long)]
    no_category: bool,

    /// Print only the summary
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scoring {
    Bm25,
    Tf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Matching {
    Any,
    All,
}

impl Args {
    fn eval_config(&self) -> EvalConfig {
        let tokenizer = TokenizerConfig {
            remove_stopwords: self.remove_stopwords,
            stem: self.stem,
            ..Default::default()
        };
        let scoring = match self.scoring {
            Scoring::Bm25 => ScoringModel::Bm25,
            Scoring::Tf => ScoringModel::TfNormalized,
        };
        let match_mode = match self.match_mode {
            Matching::Any => MatchMode::Any,
            Matching::All => MatchMode::All,
        };

        EvalConfig::new(self.questions.clone(), self.corpus.clone())
            .with_index_dir(Some(self.index_dir.clone()))
            .with_settings(
                IndexSettings::default()
                    .with_tokenizer(tokenizer)
                    .with_scoring(scoring),
            )
            .with_match_mode(match_mode)
            .with_category(!self.no_category)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting quizdex v{}", quizdex::VERSION);

    let config = args.eval_config();
    let evaluation = run(&config).with_context(|| {
        format!(
            "evaluation of {} against {} failed",
            config.questions_path.display(),
            config.corpus_dir.display()
        )
    })?;

    print_evaluation(&evaluation, args.quiet);
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation, quiet: bool) {
    if !quiet {
        for outcome in &evaluation.outcomes {
            println!("Jeopardy Clue: {}", outcome.clue);
            println!("Actual Answer: {}", outcome.answer);
            println!(
                "Retrieved Title: {}",
                outcome.retrieved.as_deref().unwrap_or("None")
            );
            println!("-----------");
        }
    }

    let report = &evaluation.report;
    println!("Precision@1: {:.4}", report.precision_at_1);
    println!("Correct: {}/{}", report.correct, report.total);
    println!("Unanswered: {}", report.unanswered);
}
