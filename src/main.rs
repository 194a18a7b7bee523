use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use distill_cli::{SessionOptions, print_answer, print_report, print_retrieved, run_session};
use distill_core::{
    ClassifierRegistry, EmbeddingProvider, Error, FactStore, LlmProvider, Splitter,
};
use distill_openai::OpenAiClient;
use distill_rag::{
    Factifier, ParagraphSplitter, Pipeline, QdrantFactStore, RuleClassifier, Summ, TurnSplitter,
};

#[derive(Parser)]
#[command(name = "distill")]
#[command(about = "Ask questions over a corpus of interview transcripts", long_about = None)]
struct Cli {
    /// Print retrieved facts alongside answers (default on)
    #[arg(long, overrides_with = "no_debug")]
    debug: bool,

    #[arg(long)]
    no_debug: bool,

    /// Per-file progress output; forces sequential ingestion
    #[arg(long, overrides_with = "no_verbose")]
    verbose: bool,

    #[arg(long)]
    no_verbose: bool,

    /// Number of facts to retrieve per query
    #[arg(short = 'n', default_value_t = 3)]
    n: usize,

    /// Directory of interview transcripts
    #[arg(long, default_value = "interviews")]
    dir: PathBuf,

    /// Name of the vector collection
    #[arg(long, default_value = "interviews")]
    index: String,

    /// Splitting strategy: "turns" or "paragraphs"
    #[arg(long, default_value = "turns")]
    splitter: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest all transcripts under the data directory
    Populate,
    /// Ask a question over the corpus
    Query {
        query: String,

        /// Restrict retrieval to facts with these labels
        #[arg(long = "classes")]
        classes: Vec<String>,
    },
}

fn splitter_for(name: &str) -> Result<Arc<dyn Splitter>, Error> {
    match name {
        "turns" => Ok(Arc::new(TurnSplitter::new())),
        "paragraphs" => Ok(Arc::new(ParagraphSplitter::default())),
        other => Err(Error::Configuration(format!(
            "unknown splitter '{other}' (expected 'turns' or 'paragraphs')"
        ))),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let debug = cli.debug || !cli.no_debug;
    let verbose = cli.verbose && !cli.no_verbose;
    let parallel = !verbose;

    // Configuration problems are fatal before any work happens
    let openai = Arc::new(OpenAiClient::from_env()?);
    let qdrant_url =
        std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6333".to_string());
    let store = Arc::new(QdrantFactStore::new(
        &qdrant_url,
        &cli.index,
        openai.dimension(),
    )?);
    store.ensure_ready().await?;

    let mut registry = ClassifierRegistry::new();
    registry.register(Arc::new(RuleClassifier::interview_defaults()));
    let registry = Arc::new(registry);

    let llm: Arc<dyn LlmProvider> = openai.clone();
    let embedder: Arc<dyn EmbeddingProvider> = openai.clone();
    let fact_store: Arc<dyn FactStore> = store.clone();

    let pipeline = Pipeline::new(
        &cli.dir,
        splitter_for(&cli.splitter)?,
        Factifier::new(llm.clone()),
        registry.clone(),
        embedder.clone(),
        fact_store.clone(),
    )
    .with_verbose(verbose);

    let mut summ = Summ::new(fact_store, llm, embedder);
    summ.n = cli.n;

    match cli.command {
        Some(Commands::Populate) => {
            println!(
                "{} Ingesting transcripts from {}...",
                "📥".blue(),
                cli.dir.display()
            );
            let report = pipeline.populate(parallel).await?;
            print_report(&report);
        }
        Some(Commands::Query { query, classes }) => {
            registry.validate_classes(&classes)?;
            let corpus: Vec<String> = pipeline.corpus()?.into_iter().collect();

            let response = summ.query(&query, &classes, &corpus, debug).await?;
            println!();
            if debug {
                print_retrieved(&response.retrieved);
            }
            print_answer(&response.answer);
        }
        None => {
            let options = SessionOptions { debug, parallel };
            run_session(&summ, &pipeline, &registry, &options).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted, cleaning up...".yellow());
            std::process::exit(130);
        }
    }
}
