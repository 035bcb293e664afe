//! # curso CLI
//!
//! Command-line interface for the curso content pipeline and search index.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use curso_core::{config::DEFAULT_CONFIG_FILE, Section};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "curso")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the search index artifact
    Index,

    /// Search the built index
    Search {
        /// Search query
        query: String,

        /// Maximum results to return (defaults to search.display_limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// List modules, the final project and annexes in course order
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single document in structured form
    Show {
        /// Document slug
        slug: String,

        /// Restrict the lookup to one section (modulo, proyecto, anexo)
        #[arg(long)]
        section: Option<Section>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ShowFormat {
    Json,
    Html,
    Toc,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Index => commands::build_index(&cli.config),
        Commands::Search { query, limit, json } => {
            let opts = commands::SearchOptions { limit, json };
            commands::search_index(&cli.config, &query, opts).await
        }
        Commands::List { json } => commands::list_documents(&cli.config, json),
        Commands::Show {
            slug,
            section,
            format,
        } => commands::show_document(&cli.config, &slug, section, format),
    }
}
