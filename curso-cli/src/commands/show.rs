//! Show a single document in structured form.

use crate::{output, ShowFormat};
use anyhow::{anyhow, Context, Result};
use curso_core::{Adjacent, Config, ContentLoader, Document, Section};
use std::path::Path;
use std::sync::Arc;

/// Fetch one document and render it in the requested format.
pub fn show_document(
    config_path: &Path,
    slug: &str,
    section: Option<Section>,
    format: ShowFormat,
) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let loader = ContentLoader::from_config(&config);

    let document = find_document(&loader, slug, section)?
        .ok_or_else(|| anyhow!("Document '{}' not found", slug))?;

    match format {
        ShowFormat::Json => {
            let adjacent = if document.section == Section::Module {
                loader
                    .get_adjacent_documents(&document.slug)
                    .context("Failed to resolve navigation")?
            } else {
                Adjacent::default()
            };
            output::print_json(
                "document.full",
                output::document_to_payload(&document, adjacent),
            )?;
        }
        ShowFormat::Html => {
            println!("{}", document.content_html);
        }
        ShowFormat::Toc => {
            for heading in &document.headings {
                let indent = "  ".repeat(usize::from(heading.level.saturating_sub(2)));
                println!("{}- {} (#{})", indent, heading.text, heading.id);
            }
        }
    }

    Ok(())
}

/// Look in the given section, or in every section in listing order.
fn find_document(
    loader: &ContentLoader,
    slug: &str,
    section: Option<Section>,
) -> Result<Option<Arc<Document>>> {
    let slug = slug.trim().trim_matches('/');
    let sections = match section {
        Some(section) => vec![section],
        None => Section::ALL.to_vec(),
    };

    for section in sections {
        let found = loader
            .get_document(section, slug)
            .with_context(|| format!("Failed to load {} documents", section))?;
        if found.is_some() {
            return Ok(found);
        }
    }

    Ok(None)
}
