// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recuerdo - contextual retrieval for conversational agents.
//!
//! Binary entry point: per-user fact memory and hybrid catalog search
//! over one SQLite database.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod demo;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use recuerdo_config::RecuerdoConfig;
use recuerdo_core::types::{EmbeddingInput, SaveOutcome};
use recuerdo_core::traits::EmbeddingAdapter;
use recuerdo_core::RecuerdoError;
use recuerdo_knowledge::{CatalogStore, HttpEmbedder, HybridRetriever, NewCatalogEntry};
use recuerdo_memory::FactStore;
use tracing_subscriber::EnvFilter;

/// Recuerdo - contextual retrieval for conversational agents.
#[derive(Parser, Debug)]
#[command(name = "recuerdo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage remembered facts about a user.
    Facts {
        #[command(subcommand)]
        command: FactsCommand,
    },
    /// Manage and search the product catalog.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FactsCommand {
    /// Save a fact, skipping duplicates.
    Add {
        /// Owner the fact belongs to.
        #[arg(long)]
        owner: String,
        /// The fact content.
        content: String,
    },
    /// Search facts by keyword relevance.
    Search {
        #[arg(long)]
        owner: String,
        /// Free-text query; keywords are extracted automatically.
        query: String,
        /// Maximum number of results (defaults to memory.search_limit).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List all facts for an owner.
    List {
        #[arg(long)]
        owner: String,
    },
    /// Delete all facts for an owner.
    Clear {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Seed the demo product catalog, embedding via the configured API.
    Seed,
    /// Hybrid search over the catalog.
    Search {
        /// Free-text query.
        query: String,
        /// Maximum number of results (defaults to retrieval.max_results).
        #[arg(long)]
        max_results: Option<usize>,
    },
}

fn init_tracing(log_level: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match recuerdo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            recuerdo_config::render_errors(errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Facts { command } => run_facts(&config, command).await,
        Commands::Catalog { command } => run_catalog(&config, command).await,
    };
    if let Err(e) = result {
        eprintln!("recuerdo: {e}");
        std::process::exit(1);
    }
}

async fn run_facts(config: &RecuerdoConfig, command: FactsCommand) -> Result<(), RecuerdoError> {
    let store = FactStore::from_config(&config.storage, &config.memory).await?;

    match command {
        FactsCommand::Add { owner, content } => {
            match store.save(&owner, &content).await? {
                SaveOutcome::Saved(id) => println!("saved ({id})"),
                SaveOutcome::Duplicate => println!("already known, skipped"),
            }
        }
        FactsCommand::Search {
            owner,
            query,
            limit,
        } => {
            let limit = limit.unwrap_or(config.memory.search_limit);
            let facts = store.search(&owner, &query, limit).await?;
            if facts.is_empty() {
                println!("no matching facts");
            }
            for fact in facts {
                println!("- {fact}");
            }
        }
        FactsCommand::List { owner } => {
            let facts = store.list_all(&owner).await?;
            if facts.is_empty() {
                println!("no facts stored for {owner}");
            }
            for fact in facts {
                println!("- {fact}");
            }
        }
        FactsCommand::Clear { owner } => {
            let removed = store.clear(&owner).await?;
            println!("removed {removed} fact(s) for {owner}");
        }
    }
    Ok(())
}

async fn run_catalog(
    config: &RecuerdoConfig,
    command: CatalogCommand,
) -> Result<(), RecuerdoError> {
    let catalog = Arc::new(CatalogStore::from_config(&config.storage).await?);
    let embedder = Arc::new(HttpEmbedder::new(&config.embedding)?);

    match command {
        CatalogCommand::Seed => {
            let removed = catalog.clear_all().await?;
            if removed > 0 {
                println!("cleared {removed} previously seeded product(s)");
            }
            let texts: Vec<String> = demo::DEMO_PRODUCTS
                .iter()
                .map(|p| p.embedding_text())
                .collect();
            let output = embedder.embed(EmbeddingInput { texts }).await?;
            if output.embeddings.len() != demo::DEMO_PRODUCTS.len() {
                return Err(RecuerdoError::Provider {
                    message: format!(
                        "expected {} embeddings, got {}",
                        demo::DEMO_PRODUCTS.len(),
                        output.embeddings.len()
                    ),
                    source: None,
                });
            }
            for (product, embedding) in demo::DEMO_PRODUCTS.iter().zip(output.embeddings) {
                let id = catalog
                    .insert(NewCatalogEntry {
                        name: product.name.to_string(),
                        category: product.category.to_string(),
                        price: product.price,
                        description: product.description.to_string(),
                        embedding,
                    })
                    .await?;
                println!("seeded #{id}: {}", product.name);
            }
            println!("catalog now holds {} product(s)", catalog.count().await?);
        }
        CatalogCommand::Search { query, max_results } => {
            let max_results = max_results.unwrap_or(config.retrieval.max_results);
            let retriever =
                HybridRetriever::new(catalog, embedder, config.retrieval.clone());
            let docs = retriever.retrieve(&query, max_results).await?;
            if docs.is_empty() {
                println!("No relevant products were found in the catalog.");
            }
            for doc in docs {
                println!("{}", doc.format_line());
            }
        }
    }
    Ok(())
}
