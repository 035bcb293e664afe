//! Runtime query side: loads a serialized artifact once and answers queries.
//!
//! The client moves `Uninitialized -> Loading -> Ready | Failed` exactly once.
//! A failed load is terminal for that client; every query then returns no
//! results instead of an error.

use super::{SearchArtifact, SearchHit};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Results shown per query
pub const DISPLAY_LIMIT: usize = 20;

/// Shown when the artifact cannot be fetched or parsed
pub const UNAVAILABLE_MESSAGE: &str = "Indice de busqueda no generado. Ejecuta curso index.";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Search artifact unavailable: {0}")]
    Unavailable(String),
}

/// Where the serialized artifact comes from
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Artifact on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArtifactSource for FileSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Artifact already in memory
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

#[async_trait]
impl ArtifactSource for StaticSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Uninitialized,
    Loading,
    Ready(Arc<SearchArtifact>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl SearchState {
    pub fn status(&self) -> SearchStatus {
        match self {
            SearchState::Uninitialized => SearchStatus::Uninitialized,
            SearchState::Loading => SearchStatus::Loading,
            SearchState::Ready(_) => SearchStatus::Ready,
            SearchState::Failed(_) => SearchStatus::Failed,
        }
    }
}

pub struct SearchClient {
    state: RwLock<SearchState>,
    limit: usize,
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_limit(DISPLAY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            state: RwLock::new(SearchState::Uninitialized),
            limit,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.state.read().status()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// User-facing message when loading failed
    pub fn error_message(&self) -> Option<String> {
        match &*self.state.read() {
            SearchState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Fetch and parse the artifact. Only the first call does any work;
    /// later calls return the current status unchanged.
    pub async fn load<S>(&self, source: &S) -> SearchStatus
    where
        S: ArtifactSource + ?Sized,
    {
        {
            let mut state = self.state.write();
            if !matches!(*state, SearchState::Uninitialized) {
                return state.status();
            }
            *state = SearchState::Loading;
        }

        let next = match source.fetch().await {
            Ok(json) => match SearchArtifact::from_json(&json) {
                Ok(artifact) => {
                    tracing::debug!(
                        "Search index ready with {} documents",
                        artifact.documents.len()
                    );
                    SearchState::Ready(Arc::new(artifact))
                }
                Err(err) => {
                    tracing::error!("Failed to parse search index: {}", err);
                    SearchState::Failed(UNAVAILABLE_MESSAGE.to_string())
                }
            },
            Err(err) => {
                tracing::error!("Failed to fetch search index: {}", err);
                SearchState::Failed(UNAVAILABLE_MESSAGE.to_string())
            }
        };

        let status = next.status();
        *self.state.write() = next;
        status
    }

    /// Best hits for `query`, capped to the display limit
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let mut hits = self.search_all(query);
        hits.truncate(self.limit);
        hits
    }

    /// Every hit for `query`; empty unless the index is ready
    pub fn search_all(&self, query: &str) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.artifact() {
            Some(artifact) => artifact.search(query),
            None => Vec::new(),
        }
    }

    fn artifact(&self) -> Option<Arc<SearchArtifact>> {
        match &*self.state.read() {
            SearchState::Ready(artifact) => Some(Arc::clone(artifact)),
            _ => None,
        }
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}
