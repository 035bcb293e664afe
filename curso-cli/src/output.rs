//! Shared JSON shapes for `--json` output.

use curso_core::{Adjacent, Document, DocumentSummary, Heading, SearchHit, Section};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "curso-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

pub fn print_json<T: Serialize>(kind: &'static str, data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&envelope(kind, data))?);
    Ok(())
}

#[derive(Serialize)]
pub struct SearchData {
    pub query: String,
    pub limit: usize,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct ListData {
    pub modules: Vec<DocumentSummary>,
    pub project: DocumentSummary,
    pub annexes: Vec<DocumentSummary>,
}

#[derive(Serialize)]
pub struct DocumentData {
    pub section: Section,
    pub slug: String,
    pub href: String,
    pub title: String,
    pub description: String,
    pub order: i64,
    pub keywords: Vec<String>,
    pub headings: Vec<Heading>,
    pub content_html: String,
    pub source_path: String,
    pub adjacent: Adjacent,
}

pub fn document_to_payload(document: &Document, adjacent: Adjacent) -> DocumentData {
    DocumentData {
        section: document.section,
        slug: document.slug.clone(),
        href: document.href.clone(),
        title: document.metadata.title.clone(),
        description: document.metadata.description.clone(),
        order: document.metadata.order,
        keywords: document.metadata.keywords.clone(),
        headings: document.headings.clone(),
        content_html: document.content_html.clone(),
        source_path: document.source_path.clone(),
        adjacent,
    }
}
