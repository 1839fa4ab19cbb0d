use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{
    paginate, process_queries, remove_duplicates, DocumentId, DocumentStatus, ExecutionPolicy, RequestQueue,
    ScoredDocument, SearchServer,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod corpus;
mod settings;

use corpus::load_corpus;
use settings::Settings;

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF index built from JSON/JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Input path (file or directory of .json/.jsonl documents)
    #[arg(long)]
    input: PathBuf,
    /// Config file; defaults to ./search.toml when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Space-separated stop words, overriding the configured ones
    #[arg(long)]
    stop_words: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more queries and print the top documents
    Search {
        #[command(flatten)]
        source: Source,
        /// Query text; repeat for several queries
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
        /// Only return documents with this status
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        /// Use the parallel ranking tier
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run every line of a file as a query, concurrently
    Batch {
        #[command(flatten)]
        source: Source,
        /// File with one query per line
        #[arg(long)]
        queries: PathBuf,
    },
    /// Show which query words a document contains
    Match {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocumentId,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Remove documents whose vocabulary repeats an earlier document
    Dedup {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { source, queries, status, parallel, page_size, json } => {
            let server = open_server(&source)?;
            search(&server, &queries, status, policy(parallel), page_size, json)
        }
        Commands::Batch { source, queries } => {
            let server = open_server(&source)?;
            batch(&server, &queries)
        }
        Commands::Match { source, query, id, parallel } => {
            let server = open_server(&source)?;
            let (words, status) = server.match_document_with(policy(parallel), &query, id)?;
            println!("document {id} ({status}): {}", words.join(" "));
            if let Some(text) = server.document_text(id) {
                println!("  {text}");
            }
            Ok(())
        }
        Commands::Dedup { source } => {
            let mut server = open_server(&source)?;
            let removed = remove_duplicates(&mut server)?;
            for id in &removed {
                println!("Found duplicate document id {id}");
            }
            tracing::info!(removed = removed.len(), remaining = server.document_count(), "dedup complete");
            Ok(())
        }
    }
}

fn policy(parallel: bool) -> ExecutionPolicy {
    if parallel {
        ExecutionPolicy::Parallel
    } else {
        ExecutionPolicy::Sequential
    }
}

fn open_server(source: &Source) -> Result<SearchServer> {
    let mut settings = Settings::load(source.config.as_deref())?;
    if let Some(stop_words) = &source.stop_words {
        settings.stop_words = stop_words.clone();
    }
    let mut server = SearchServer::with_config(settings.stop_words()?, settings.engine)?;
    let config = server.config();
    tracing::debug!(
        max_result_count = config.max_result_count,
        relevance_epsilon = config.relevance_epsilon,
        shard_count = config.shard_count,
        stop_words = server.stop_words().len(),
        "engine configured"
    );
    load_corpus(&mut server, &source.input)?;
    Ok(server)
}

fn search(
    server: &SearchServer,
    queries: &[String],
    status: DocumentStatus,
    policy: ExecutionPolicy,
    page_size: usize,
    json: bool,
) -> Result<()> {
    let mut requests = RequestQueue::new(server);
    for query in queries {
        let results = match policy {
            ExecutionPolicy::Sequential => requests.add_find_request_by(query, status)?,
            ExecutionPolicy::Parallel => server.find_top_documents_with(policy, query, &status)?,
        };
        print_results(query, &results, page_size, json)?;
    }
    if policy == ExecutionPolicy::Sequential {
        tracing::info!(
            requests = requests.len(),
            no_result = requests.no_result_requests(),
            "search complete"
        );
    }
    Ok(())
}

fn batch(server: &SearchServer, path: &PathBuf) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let queries: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let results = process_queries(server, &queries)?;
    for (query, documents) in queries.iter().zip(&results) {
        println!("{query}");
        for document in documents {
            println!("  {document}");
        }
    }
    tracing::info!(queries = queries.len(), "batch complete");
    Ok(())
}

fn print_results(query: &str, results: &[ScoredDocument], page_size: usize, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({ "query": query, "results": results });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("{query}");
    for (number, page) in paginate(results, page_size).iter().enumerate() {
        println!("  page {}:", number + 1);
        for document in page.items() {
            println!("    {document}");
        }
    }
    Ok(())
}
