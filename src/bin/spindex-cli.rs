//! spindex CLI — build an index from a corpus, or query a built one.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use spindex::{IndexConfig, SearchIndex};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "spindex", version = VERSION, about = "SPIMI inverted index builder and query tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an index from a corpus.
    Build {
        /// Path to the corpus (CSV with `song_id` and `lyrics` columns).
        #[arg(long)]
        corpus: PathBuf,

        /// Directory the index is written to.
        #[arg(long)]
        index_dir: PathBuf,

        /// Documents accumulated in memory before a SPIMI flush.
        #[arg(long, default_value_t = 500)]
        block_limit: usize,

        /// Optional stop-word file (one word per line).
        #[arg(long)]
        stopwords: Option<PathBuf>,

        /// Apply Snowball English stemming.
        #[arg(long)]
        stem: bool,
    },

    /// Query a previously built index.
    Query {
        /// Directory the index was built into.
        #[arg(long)]
        index_dir: PathBuf,

        /// Free-text query.
        text: String,

        /// Number of results to return.
        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            corpus,
            index_dir,
            block_limit,
            stopwords,
            stem,
        } => build(corpus, index_dir, block_limit, stopwords, stem),
        Command::Query {
            index_dir,
            text,
            top_k,
        } => query(index_dir, &text, top_k),
    }
}

fn build(
    corpus: PathBuf,
    index_dir: PathBuf,
    block_limit: usize,
    stopwords: Option<PathBuf>,
    stem: bool,
) -> anyhow::Result<()> {
    println!("📂 corpus:    {}", corpus.display());
    println!("📁 index dir: {}", index_dir.display());
    println!("🔧 block_limit={block_limit} stem={stem}");

    let mut config = IndexConfig::with_block_limit(block_limit);
    if stem {
        config = config.with_stemming();
    }
    if let Some(path) = stopwords {
        config = config.with_stopwords(path);
    }

    let started = Instant::now();
    let documents = spindex::corpus::CsvCorpus::open(&corpus)?.into_documents();
    let index = SearchIndex::build(&index_dir, config, documents)?;
    println!(
        "✅ build finished in {:.2}s ({})",
        started.elapsed().as_secs_f64(),
        index.index_dir().display()
    );
    Ok(())
}

fn query(index_dir: PathBuf, text: &str, top_k: usize) -> anyhow::Result<()> {
    let index = SearchIndex::open(&index_dir)?;
    let results = index.query(text, top_k)?;

    if results.is_empty() {
        println!("📊 no results");
        return Ok(());
    }

    println!("🔎 top {} results for {text:?}", results.len());
    for (rank, doc) in results.iter().enumerate() {
        println!("  {:>2}. doc_id={:<10} score={:.4}", rank + 1, doc.doc_id, doc.score);
    }
    Ok(())
}
