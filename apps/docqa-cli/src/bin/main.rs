use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docqa_cli::{ingest_directory, render_results};
use docqa_core::config::{resolve_with_base, Config, Settings};
use docqa_hybrid::DocumentStore;

/// Hybrid semantic + keyword search over a directory of text files.
#[derive(Parser)]
#[command(name = "docqa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a directory and answer one or more queries.
    Query {
        #[command(flatten)]
        opts: CommonOpts,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
        /// Queries to run, in order.
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Ingest a directory, then read queries from stdin.
    Interactive {
        #[command(flatten)]
        opts: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Directory of .txt files; defaults to `data.txt_dir` from config.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Number of results per query; defaults to `retrieval.default_k`.
    #[arg(short, long)]
    k: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Config::load()?.settings()?;

    match cli.command {
        Command::Query { opts, json, queries } => {
            let (store, k) = open(&settings, &opts, !json)?;
            if json {
                let mut out = serde_json::Map::new();
                for q in &queries {
                    out.insert(q.clone(), serde_json::to_value(store.search(q, k)?)?);
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for q in &queries {
                    print!("{}", render_results(q, &store.search(q, k)?));
                }
            }
        }
        Command::Interactive { opts } => {
            let (store, k) = open(&settings, &opts, true)?;
            repl(&store, k)?;
        }
    }
    Ok(())
}

fn open(settings: &Settings, opts: &CommonOpts, progress: bool) -> anyhow::Result<(DocumentStore, usize)> {
    let dir = match &opts.data_dir {
        Some(d) => d.clone(),
        None => resolve_with_base(&std::env::current_dir()?, &settings.data.txt_dir),
    };
    let store = DocumentStore::from_config(settings)?;
    ingest_directory(&store, &dir, &settings.data, progress)?;
    let k = opts.k.unwrap_or(store.default_k());
    Ok((store, k))
}

fn repl(store: &DocumentStore, k: usize) -> anyhow::Result<()> {
    println!("{} chunks indexed. Type a question, :stats, :clear or :quit.", store.len());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":clear" => {
                store.clear_cache();
                println!("caches cleared");
            }
            ":stats" => println!("{} documents", store.len()),
            q => match store.retrieve_context(q, k) {
                Ok(ctx) if ctx.is_empty() => println!("No relevant information found."),
                Ok(ctx) => {
                    print!("{}", render_results(q, &ctx.passages));
                    println!("confidence: {:.4}", ctx.confidence);
                }
                Err(e) => tracing::error!("search failed: {e}"),
            },
        }
    }
    Ok(())
}
