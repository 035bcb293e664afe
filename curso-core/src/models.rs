//! Content model structs for course documents and their navigation.

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content category a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// Numbered course module
    #[serde(rename = "modulo")]
    Module,
    /// The single capstone project
    #[serde(rename = "proyecto")]
    Project,
    /// Reference annex (glossary, cheat sheets)
    #[serde(rename = "anexo")]
    Annex,
}

impl Section {
    /// Every section, in the order they are indexed and listed.
    pub const ALL: [Section; 3] = [Section::Module, Section::Project, Section::Annex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Module => "modulo",
            Section::Project => "proyecto",
            Section::Annex => "anexo",
        }
    }

    /// Directory under the content root holding this section's files
    pub fn dir_name(&self) -> &'static str {
        match self {
            Section::Module => "modulos",
            Section::Project => "proyecto-final",
            Section::Annex => "anexos",
        }
    }

    /// Human-readable label for result lists
    pub fn label(&self) -> &'static str {
        match self {
            Section::Module => "Modulo",
            Section::Project => "Proyecto final",
            Section::Annex => "Anexo",
        }
    }

    /// Whether a build must abort when this section's directory is missing
    pub fn is_required(&self) -> bool {
        match self {
            Section::Module | Section::Project => true,
            Section::Annex => false,
        }
    }

    /// Site URL for a document of this section. `base_url` must already be
    /// normalized (leading and trailing slash).
    pub fn href(&self, base_url: &str, slug: &str) -> String {
        match self {
            Section::Module => format!("{}modulos/{}", base_url, slug),
            Section::Project => format!("{}proyecto-final", base_url),
            Section::Annex => format!("{}anexos#{}", base_url, slug),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modulo" | "modulos" | "module" => Ok(Section::Module),
            "proyecto" | "proyecto-final" | "project" => Ok(Section::Project),
            "anexo" | "anexos" | "annex" => Ok(Section::Annex),
            other => Err(format!("unknown section '{}'", other)),
        }
    }
}

/// Table-of-contents entry extracted from a document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id, unique within the document
    pub id: String,
    pub text: String,
    /// Nesting level, 2 through 4
    pub level: u8,
}

/// A fully resolved course document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub section: Section,

    /// URL slug derived from the file name (e.g., "funciones")
    pub slug: String,

    pub href: String,

    pub metadata: Metadata,

    /// Markdown body without front-matter
    pub raw_body: String,

    /// Rendered HTML content
    pub content_html: String,

    /// Table of contents (levels 2-4)
    pub headings: Vec<Heading>,

    /// Source path relative to the content root
    pub source_path: String,
}

impl Document {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn order(&self) -> i64 {
        self.metadata.order
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            section: self.section,
            slug: self.slug.clone(),
            href: self.href.clone(),
            title: self.metadata.title.clone(),
            description: self.metadata.description.clone(),
            order: self.metadata.order,
            keywords: self.metadata.keywords.clone(),
        }
    }
}

/// Listing view of a document, without its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub section: Section,
    pub slug: String,
    pub href: String,
    pub title: String,
    pub description: String,
    pub order: i64,
    pub keywords: Vec<String>,
}

/// Previous/next modules around a given module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacent {
    pub previous: Option<DocumentSummary>,
    pub next: Option<DocumentSummary>,
}

impl Adjacent {
    /// Locate `slug` in an ordered list and return its neighbours.
    pub fn locate(ordered: &[DocumentSummary], slug: &str) -> Self {
        let Some(index) = ordered.iter().position(|d| d.slug == slug) else {
            return Self::default();
        };

        Self {
            previous: index.checked_sub(1).map(|i| ordered[i].clone()),
            next: ordered.get(index + 1).cloned(),
        }
    }
}
