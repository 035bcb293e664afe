//! Build-time search indexing and the serialized search artifact.
//!
//! [`SearchArtifact`] bundles the flat records, the [`TextIndex`] built over
//! them and the [`SearchConfig`] the runtime needs to query it. It is written
//! once per build as pretty JSON and never mutated afterwards.

pub mod client;
pub mod fuzzy;
pub mod index;
pub mod tokenize;

use crate::loader::{ContentLoader, LoadError};
use crate::models::{Document, Section};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use client::{SearchClient, SearchState, DISPLAY_LIMIT};
pub use index::{SearchHit, TextIndex};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Unknown search field: {0}")]
    UnknownField(String),

    #[error("Invalid search artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index fields {index:?} do not match configured fields {config:?}")]
    FieldMismatch {
        index: Vec<String>,
        config: Vec<String>,
    },

    #[error("Inconsistent search index: {0}")]
    CorruptIndex(String),
}

/// Flat searchable view of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// `"{section}-{slug}"`
    pub id: String,
    pub title: String,
    pub description: String,
    pub href: String,
    pub order: i64,
    pub section: Section,
    pub keywords: Vec<String>,
    /// Heading texts, in document order
    pub headings: Vec<String>,
}

impl SearchRecord {
    /// Names usable in `fields` and `storeFields`
    pub const FIELDS: [&'static str; 8] = [
        "id",
        "title",
        "description",
        "href",
        "order",
        "section",
        "keywords",
        "headings",
    ];

    pub fn from_document(document: &Document) -> Self {
        Self {
            id: format!("{}-{}", document.section, document.slug),
            title: document.metadata.title.clone(),
            description: document.metadata.description.clone(),
            href: document.href.clone(),
            order: document.metadata.order,
            section: document.section,
            keywords: document.metadata.keywords.clone(),
            headings: document.headings.iter().map(|h| h.text.clone()).collect(),
        }
    }

    /// Indexable text of a field
    pub fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.clone()),
            "title" => Some(self.title.clone()),
            "description" => Some(self.description.clone()),
            "href" => Some(self.href.clone()),
            "order" => Some(self.order.to_string()),
            "section" => Some(self.section.to_string()),
            "keywords" => Some(self.keywords.join(" ")),
            "headings" => Some(self.headings.join(" ")),
            _ => None,
        }
    }

    /// Value kept in the index for display
    pub fn stored_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id.as_str())),
            "title" => Some(Value::from(self.title.as_str())),
            "description" => Some(Value::from(self.description.as_str())),
            "href" => Some(Value::from(self.href.as_str())),
            "order" => Some(Value::from(self.order)),
            "section" => Some(Value::from(self.section.as_str())),
            "keywords" => Some(Value::from(self.keywords.clone())),
            "headings" => Some(Value::from(self.headings.clone())),
            _ => None,
        }
    }
}

/// Query-time defaults shipped with the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default = "default_prefix")]
    pub prefix: bool,

    /// Fraction of the query term length allowed as edit distance
    #[serde(default = "default_fuzzy")]
    pub fuzzy: f64,

    /// Per-field score multipliers; fields not listed weigh 1
    #[serde(default)]
    pub boost: BTreeMap<String, f64>,
}

fn default_prefix() -> bool {
    true
}

fn default_fuzzy() -> f64 {
    0.2
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            fuzzy: default_fuzzy(),
            boost: BTreeMap::from([
                ("title".to_string(), 3.0),
                ("keywords".to_string(), 2.0),
                ("headings".to_string(), 2.0),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Fields that are tokenized and indexed
    pub fields: Vec<String>,

    /// Fields returned with every hit
    pub store_fields: Vec<String>,

    pub search_options: SearchOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: ["title", "description", "keywords", "headings"]
                .map(String::from)
                .to_vec(),
            store_fields: ["title", "description", "href", "section", "order"]
                .map(String::from)
                .to_vec(),
            search_options: SearchOptions::default(),
        }
    }
}

/// Records for every document: modules, then the project, then annexes.
pub fn collect_search_records(loader: &ContentLoader) -> Result<Vec<SearchRecord>, LoadError> {
    let mut records: Vec<SearchRecord> = loader
        .modules()?
        .iter()
        .map(|document| SearchRecord::from_document(document))
        .collect();

    let project = loader.project()?;
    records.push(SearchRecord::from_document(&project));

    records.extend(
        loader
            .annexes()?
            .iter()
            .map(|document| SearchRecord::from_document(document)),
    );

    Ok(records)
}

/// The serialized search index: `{ documents, index, config }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchArtifact {
    pub documents: Vec<SearchRecord>,
    pub index: TextIndex,
    pub config: SearchConfig,
}

impl SearchArtifact {
    pub fn build(records: Vec<SearchRecord>, config: SearchConfig) -> Result<Self, SearchError> {
        let index = TextIndex::build(&config, &records)?;
        Ok(Self {
            documents: records,
            index,
            config,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, SearchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let artifact: SearchArtifact = serde_json::from_str(json)?;
        if artifact.index.fields() != artifact.config.fields.as_slice() {
            return Err(SearchError::FieldMismatch {
                index: artifact.index.fields().to_vec(),
                config: artifact.config.fields.clone(),
            });
        }
        artifact.index.validate()?;
        Ok(artifact)
    }

    /// Write the artifact, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> Result<(), SearchError> {
        let io_error = |source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_json_pretty()?).map_err(io_error)?;

        tracing::info!(
            "Wrote search index with {} documents and {} terms to {:?}",
            self.documents.len(),
            self.index.term_count(),
            path
        );
        Ok(())
    }

    /// Query with the options shipped in the artifact
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.index.search(query, &self.config.search_options)
    }
}

/// Collect every record under `loader` and index it.
pub fn build_artifact(
    loader: &ContentLoader,
    config: SearchConfig,
) -> Result<SearchArtifact, BuildArtifactError> {
    let records = collect_search_records(loader)?;
    Ok(SearchArtifact::build(records, config)?)
}

#[derive(Error, Debug)]
pub enum BuildArtifactError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    #[test]
    fn test_default_config_json() {
        let json = serde_json::to_string_pretty(&SearchConfig::default()).unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "fields": [
            "title",
            "description",
            "keywords",
            "headings"
          ],
          "storeFields": [
            "title",
            "description",
            "href",
            "section",
            "order"
          ],
          "searchOptions": {
            "prefix": true,
            "fuzzy": 0.2,
            "boost": {
              "headings": 2.0,
              "keywords": 2.0,
              "title": 3.0
            }
          }
        }
        "###);
    }

    #[test]
    fn test_record_from_document() {
        let document = Document {
            section: Section::Annex,
            slug: "glosario".into(),
            href: "/anexos#glosario".into(),
            metadata: Metadata {
                title: "Glosario".into(),
                description: "Terminos".into(),
                order: 0,
                keywords: vec!["glosario".into()],
            },
            raw_body: String::new(),
            content_html: String::new(),
            headings: vec![crate::models::Heading {
                id: "a".into(),
                text: "A".into(),
                level: 2,
            }],
            source_path: "anexos/glosario.md".into(),
        };

        let record = SearchRecord::from_document(&document);
        assert_eq!(record.id, "anexo-glosario");
        assert_eq!(record.headings, vec!["A".to_string()]);
        assert_eq!(record.field_text("keywords").as_deref(), Some("glosario"));
        assert_eq!(record.stored_value("section"), Some(Value::from("anexo")));
        assert_eq!(record.field_text("content"), None);
    }

    #[test]
    fn test_mismatched_fields_are_rejected() {
        let artifact = SearchArtifact::build(vec![], SearchConfig::default()).unwrap();
        let mut value = serde_json::to_value(&artifact).unwrap();
        value["config"]["fields"] = serde_json::json!(["title"]);

        let result = SearchArtifact::from_json(&value.to_string());
        assert!(matches!(result, Err(SearchError::FieldMismatch { .. })));
    }

    #[test]
    fn test_truncated_index_tables_are_rejected() {
        let records = vec![SearchRecord {
            id: "modulo-listas".into(),
            title: "Listas".into(),
            description: "Listas en Python".into(),
            href: "/modulos/listas".into(),
            order: 1,
            section: Section::Module,
            keywords: vec![],
            headings: vec![],
        }];
        let artifact = SearchArtifact::build(records, SearchConfig::default()).unwrap();
        let mut value = serde_json::to_value(&artifact).unwrap();
        value["index"]["fieldLengths"] = serde_json::json!([]);

        let result = SearchArtifact::from_json(&value.to_string());
        assert!(matches!(result, Err(SearchError::CorruptIndex(_))));
    }
}
