//! Content loading - discovers, parses and orders the course documents.

use crate::{
    cache::DocumentCache,
    config::Config,
    frontmatter::parse_metadata,
    markdown::MarkdownProcessor,
    metadata::resolve_metadata,
    models::{Adjacent, Document, DocumentSummary, Section},
    slug::{leading_number, slug_from_filename},
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing {section} directory: {path:?}")]
    MissingDirectory { section: Section, path: PathBuf },

    #[error("No markdown file for required section '{section}' in {path:?}")]
    MissingRequired { section: Section, path: PathBuf },

    #[error("Duplicate slug '{slug}' in section '{section}'")]
    DuplicateSlug { section: Section, slug: String },

    #[error("Invalid document path: {0:?}")]
    InvalidPath(PathBuf),
}

impl LoadError {
    fn io(path: &Path, source: io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads course documents from a content root laid out as
/// `modulos/`, `proyecto-final/` and `anexos/`.
pub struct ContentLoader {
    root: PathBuf,
    base_url: String,
    processor: MarkdownProcessor,
    cache: DocumentCache,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: "/".to_string(),
            processor: MarkdownProcessor::new(),
            cache: DocumentCache::new(),
        }
    }

    /// Prefix for every generated href; must be normalized ("/" or "/x/")
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.content_dir()).with_base_url(config.normalized_base_url())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn section_dir(&self, section: Section) -> PathBuf {
        self.root.join(section.dir_name())
    }

    /// Markdown file names of a section, ordered by their numeric prefix.
    ///
    /// Names without a prefix come after the numbered ones, by name.
    pub fn list_documents(&self, section: Section) -> Result<Vec<String>, LoadError> {
        let dir = self.section_dir(section);
        if !dir.is_dir() {
            if section.is_required() {
                return Err(LoadError::MissingDirectory { section, path: dir });
            }
            tracing::debug!("No {} directory at {:?}", section, dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir.as_path()).to_path_buf();
                LoadError::Io {
                    path,
                    source: io::Error::from(err),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };

            if is_markdown(name) {
                names.push(name.to_string());
            }
        }

        names.sort_by(|a, b| file_order(a).cmp(&file_order(b)));
        Ok(names)
    }

    /// Parse one file into a document. Results are cached by mtime.
    pub fn parse_document(&self, section: Section, path: &Path) -> Result<Arc<Document>, LoadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LoadError::InvalidPath(path.to_path_buf()))?;

        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|err| LoadError::io(path, err))?;

        if let Some(document) = self.cache.get(&self.root, section, path, modified) {
            return Ok(document);
        }

        let source_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let _span = tracing::debug_span!("parse", path = %source_path).entered();
        tracing::debug!("Parsing {}", source_path);

        let raw = fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
        let (partial, body) = parse_metadata(&raw);
        let metadata = resolve_metadata(partial, body, file_name);
        let compiled = self.processor.compile(body);

        let slug = slug_from_filename(file_name);
        let document = Arc::new(Document {
            section,
            href: section.href(&self.base_url, &slug),
            slug,
            metadata,
            raw_body: body.to_string(),
            content_html: compiled.html,
            headings: compiled.headings,
            source_path,
        });

        self.cache
            .insert(&self.root, section, path, modified, Arc::clone(&document));
        Ok(document)
    }

    /// Every document of a section, sorted by order key.
    ///
    /// Files are parsed in parallel; equal order keys keep file-name order.
    pub fn load_section(&self, section: Section) -> Result<Vec<Arc<Document>>, LoadError> {
        let dir = self.section_dir(section);
        let names = self.list_documents(section)?;

        let mut documents = names
            .par_iter()
            .map(|name| self.parse_document(section, &dir.join(name)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for document in &documents {
            if !seen.insert(document.slug.as_str()) {
                tracing::warn!("Duplicate slug: {}", document.slug);
                return Err(LoadError::DuplicateSlug {
                    section,
                    slug: document.slug.clone(),
                });
            }
        }

        documents.sort_by_key(|document| document.order());

        tracing::info!("Loaded {} {} documents", documents.len(), section);
        Ok(documents)
    }

    pub fn modules(&self) -> Result<Vec<Arc<Document>>, LoadError> {
        self.load_section(Section::Module)
    }

    /// The capstone project; its directory must hold at least one file.
    pub fn project(&self) -> Result<Arc<Document>, LoadError> {
        let mut documents = self.load_section(Section::Project)?;
        if documents.len() > 1 {
            tracing::debug!(
                "{} project files found, using {}",
                documents.len(),
                documents[0].source_path
            );
        }
        if documents.is_empty() {
            return Err(LoadError::MissingRequired {
                section: Section::Project,
                path: self.section_dir(Section::Project),
            });
        }
        Ok(documents.swap_remove(0))
    }

    pub fn annexes(&self) -> Result<Vec<Arc<Document>>, LoadError> {
        self.load_section(Section::Annex)
    }

    /// Look up one document; `Ok(None)` when no file has that slug.
    pub fn get_document(
        &self,
        section: Section,
        slug: &str,
    ) -> Result<Option<Arc<Document>>, LoadError> {
        Ok(self
            .load_section(section)?
            .into_iter()
            .find(|document| document.slug == slug))
    }

    /// Previous and next module around `slug`, from the current module order.
    pub fn get_adjacent_documents(&self, slug: &str) -> Result<Adjacent, LoadError> {
        let ordered: Vec<DocumentSummary> = self
            .modules()?
            .iter()
            .map(|document| document.summary())
            .collect();
        Ok(Adjacent::locate(&ordered, slug))
    }
}

fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "md" || ext == "mdx")
}

fn file_order(name: &str) -> (bool, u64, &str) {
    let number = leading_number(name);
    (number.is_none(), number.unwrap_or(0), name)
}
