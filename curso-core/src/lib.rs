//! # curso-core
//!
//! Core library for the curso course site.
//!
//! This crate loads the course's Markdown content (modules, the capstone
//! project and annexes), compiles it to HTML with a heading outline, and
//! builds the search artifact the site queries at runtime.

pub mod cache;
pub mod config;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod metadata;
pub mod models;
pub mod search;
pub mod slug;

pub use cache::{CacheStats, DocumentCache};
pub use config::Config;
pub use loader::{ContentLoader, LoadError};
pub use markdown::{extract_headings, CompiledMarkdown, MarkdownProcessor};
pub use metadata::{resolve_metadata, Metadata, PartialMetadata};
pub use models::{Adjacent, Document, DocumentSummary, Heading, Section};
pub use search::client::{ArtifactSource, FileSource, SearchStatus, StaticSource};
pub use search::{
    build_artifact, collect_search_records, SearchArtifact, SearchClient, SearchConfig,
    SearchError, SearchHit, SearchRecord,
};
pub use slug::{slug_from_filename, slugify};
