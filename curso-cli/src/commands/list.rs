//! List command implementation.

use crate::output::{self, ListData};
use anyhow::{Context, Result};
use curso_core::{Config, ContentLoader, DocumentSummary, Section};
use std::path::Path;

/// Print the course outline: modules, project, annexes
pub fn list_documents(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let loader = ContentLoader::from_config(&config);

    let modules: Vec<DocumentSummary> = loader
        .modules()
        .context("Failed to load modules")?
        .iter()
        .map(|document| document.summary())
        .collect();
    let project = loader
        .project()
        .context("Failed to load final project")?
        .summary();
    let annexes: Vec<DocumentSummary> = loader
        .annexes()
        .context("Failed to load annexes")?
        .iter()
        .map(|document| document.summary())
        .collect();

    if json {
        return output::print_json(
            "documents.list",
            ListData {
                modules,
                project,
                annexes,
            },
        );
    }

    println!("{}s:", Section::Module.label());
    for summary in &modules {
        println!("  {:>3}  {:<32} {}", summary.order, summary.title, summary.href);
    }

    println!("\n{}:", Section::Project.label());
    println!("       {:<32} {}", project.title, project.href);

    if !annexes.is_empty() {
        println!("\n{}s:", Section::Annex.label());
        for summary in &annexes {
            println!("       {:<32} {}", summary.title, summary.href);
        }
    }

    Ok(())
}
