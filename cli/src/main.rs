//! notesim - find notes similar to a note or to free text.
//!
//! Indexes a vault of markdown notes through an embeddings API, then answers
//! one query or keeps the index current while watching the vault.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notesim_engine::{
    EngineConfig, EngineOutput, Settings, SimilarNotes, SimilarityResult, VaultWatcher,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Semantic "similar notes" for a folder of notes
#[derive(Parser, Debug)]
#[command(name = "notesim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find notes similar to a note or to free text", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Vault directory (overrides the configuration file)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Settings blob (JSON with an `apiKey` field)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// API key for the embeddings endpoint
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Embedding model
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL of the embeddings API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Number of similar notes to show
    #[arg(short = 'n', long, global = true)]
    top_n: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Notes similar to an existing note
    Similar {
        /// Path to the note
        note: PathBuf,
    },

    /// Notes similar to free text
    Query {
        /// Text to search for
        text: String,
    },

    /// Keep the index current and print neighbours of every changed note
    Watch,

    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli).await?;
    let mut engine = SimilarNotes::from_config(config);

    let count = engine
        .rebuild()
        .await
        .context("failed to index vault")?;
    info!("Indexed {count} notes");

    match &cli.command {
        Commands::Similar { note } => similar(&engine, note, cli.json).await?,
        Commands::Query { text } => {
            let results = engine.query(text, engine.config().top_n).await;
            print_results(&results, cli.json)?;
        }
        Commands::Watch => watch(&mut engine, cli.json).await?,
        Commands::Stats => {
            let stats = engine.stats();
            println!("notes:        {}", stats.documents);
            println!("unavailable:  {}", stats.unavailable);
            println!("dimension:    {}", stats.dimension);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer the configuration file, the settings blob and command-line flags.
async fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(vault) = &cli.vault {
        config.vault.root = vault.clone();
    }
    // Watch events carry absolute paths.
    config.vault.root = tokio::fs::canonicalize(&config.vault.root)
        .await
        .with_context(|| format!("vault not found: {}", config.vault.root.display()))?;

    if let Some(path) = &cli.settings {
        let blob = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        config.settings = Settings::from_json(&blob);
    }
    if let Some(key) = &cli.api_key {
        config.settings.api_key = key.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(top_n) = cli.top_n {
        config.top_n = top_n;
    }

    if !config.settings.has_api_key() {
        warn!("No API key configured; every note will be unmatchable");
    }

    Ok(config)
}

async fn similar(engine: &SimilarNotes, note: &Path, json: bool) -> Result<()> {
    let path = tokio::fs::canonicalize(note)
        .await
        .with_context(|| format!("note not found: {}", note.display()))?;

    let id = engine
        .config()
        .vault
        .document_id(&path)
        .filter(|id| engine.index().contains(id));

    let results = match id {
        Some(id) => engine.neighbours(&id),
        None => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            engine.query(&text, engine.config().top_n).await
        }
    };

    print_results(&results, json)
}

async fn watch(engine: &mut SimilarNotes, json: bool) -> Result<()> {
    let mut watcher = VaultWatcher::new(engine.config().vault.clone())?;
    watcher.start()?;
    eprintln!(
        "Watching {} (Ctrl-C to stop)",
        engine.config().vault.root.display()
    );

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        handled = engine.run(&mut watcher, |engine, output| {
            if let Err(e) = print_output(engine, output, json) {
                warn!("Failed to print results: {e}");
            }
        }) => info!("Watcher closed after {handled} events"),
    }

    watcher.stop();
    Ok(())
}

fn print_output(engine: &SimilarNotes, output: &EngineOutput, json: bool) -> Result<()> {
    match output {
        EngineOutput::Indexed { id, .. } => {
            println!("{id}:");
            print_results(&engine.neighbours(id), json)?;
        }
        EngineOutput::Removed { id } => println!("removed {id}"),
        EngineOutput::Renamed { from, to } => println!("renamed {from} -> {to}"),
        EngineOutput::Similar { results, .. } => print_results(results, json)?,
        EngineOutput::Ignored => {}
    }
    Ok(())
}

fn print_results(results: &[SimilarityResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("  (no notes)");
    }
    for result in results {
        println!("  {:>7.4}  {}", result.score, result.id);
    }
    Ok(())
}
