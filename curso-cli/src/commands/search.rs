//! Search command implementation.

use crate::output::{self, SearchData};
use anyhow::{bail, Context, Result};
use curso_core::{Config, FileSource, SearchClient, SearchHit, SearchStatus};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    pub json: bool,
}

/// Query the built search artifact
pub async fn search_index(config_path: &Path, query: &str, opts: SearchOptions) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let limit = opts.limit.unwrap_or(config.search.display_limit);

    let client = SearchClient::with_limit(limit);
    let source = FileSource::new(config.artifact_path());
    if client.load(&source).await != SearchStatus::Ready {
        bail!(
            "{}",
            client
                .error_message()
                .unwrap_or_else(|| "Search index unavailable".to_string())
        );
    }

    let total = client.search_all(query).len();
    let results = client.search(query);

    if opts.json {
        return output::print_json(
            "search.results",
            SearchData {
                query: query.to_string(),
                limit,
                total,
                results,
            },
        );
    }

    if results.is_empty() {
        println!("No results found for '{}'", query);
        return Ok(());
    }

    println!("\nFound {} results for '{}':\n", total, query);
    for hit in &results {
        print_search_result(hit);
    }

    if total > results.len() {
        println!("  ... and {} more results", total - results.len());
    }

    Ok(())
}

fn print_search_result(hit: &SearchHit) {
    // [modulo] Funciones
    //   /modulos/funciones
    //   Definir y llamar funciones
    println!(
        "[{}] {}",
        hit.section().unwrap_or("?"),
        hit.title().unwrap_or(&hit.id)
    );
    if let Some(href) = hit.href() {
        println!("  {}", href);
    }
    if let Some(description) = hit.description() {
        println!("  {}", description);
    }
    println!();
}
