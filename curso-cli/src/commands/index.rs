//! Index command implementation.

use anyhow::{Context, Result};
use curso_core::{build_artifact, Config, ContentLoader, SearchConfig};
use std::path::Path;

/// Regenerate the search artifact from the content tree
pub fn build_index(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;

    let loader = ContentLoader::from_config(&config);
    tracing::info!("Indexing content in {:?}", loader.root());

    let artifact = build_artifact(&loader, SearchConfig::default())
        .context("Failed to build search index")?;

    let path = config.artifact_path();
    artifact
        .write_to(&path)
        .with_context(|| format!("Failed to write search index to {:?}", path))?;

    println!(
        "Indexed {} documents into {}",
        artifact.documents.len(),
        path.display()
    );
    Ok(())
}
