//! Parsed-document cache for a single build invocation.
//!
//! Entries are keyed by content root, section and file path and remember the
//! file's modification time; a changed mtime is a miss. The cache is never global:
//! it lives inside one [`crate::ContentLoader`] and is cleared explicitly with
//! [`DocumentCache::invalidate`].

use crate::models::{Document, Section};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    root: PathBuf,
    section: Section,
    path: PathBuf,
}

impl CacheKey {
    fn new(root: &Path, section: Section, path: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            section,
            path: path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    modified: SystemTime,
    document: Arc<Document>,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached document for `path` if it was parsed for `section` at the same mtime
    pub fn get(
        &self,
        root: &Path,
        section: Section,
        path: &Path,
        modified: SystemTime,
    ) -> Option<Arc<Document>> {
        let key = CacheKey::new(root, section, path);

        let found = self
            .entries
            .lock()
            .get(&key)
            .filter(|entry| entry.modified == modified)
            .map(|entry| Arc::clone(&entry.document));

        match found {
            Some(document) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(document)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(
        &self,
        root: &Path,
        section: Section,
        path: &Path,
        modified: SystemTime,
        document: Arc<Document>,
    ) {
        let key = CacheKey::new(root, section, path);
        self.entries.lock().insert(key, CacheEntry { modified, document });
    }

    /// Drop every entry and reset the counters
    pub fn invalidate(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use std::time::Duration;

    fn document(slug: &str) -> Arc<Document> {
        Arc::new(Document {
            section: Section::Module,
            slug: slug.into(),
            href: format!("/modulos/{}", slug),
            metadata: Metadata {
                title: slug.into(),
                description: slug.into(),
                order: 1,
                keywords: vec![],
            },
            raw_body: String::new(),
            content_html: String::new(),
            headings: vec![],
            source_path: format!("modulos/01-{}.md", slug),
        })
    }

    #[test]
    fn test_hit_requires_same_mtime() {
        let cache = DocumentCache::new();
        let root = Path::new("/curso");
        let path = Path::new("/curso/modulos/01-intro.md");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let t1 = t0 + Duration::from_secs(1);

        cache.insert(root, Section::Module, path, t0, document("intro"));

        assert!(cache.get(root, Section::Module, path, t0).is_some());
        assert!(cache.get(root, Section::Module, path, t1).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_keys_include_content_root() {
        let cache = DocumentCache::new();
        let path = Path::new("modulos/01-intro.md");
        let t0 = SystemTime::UNIX_EPOCH;

        cache.insert(Path::new("/a"), Section::Module, path, t0, document("intro"));
        assert!(cache.get(Path::new("/b"), Section::Module, path, t0).is_none());
    }

    #[test]
    fn test_keys_include_section() {
        let cache = DocumentCache::new();
        let root = Path::new("/curso");
        let path = Path::new("/curso/compartido/intro.md");
        let t0 = SystemTime::UNIX_EPOCH;

        cache.insert(root, Section::Module, path, t0, document("intro"));
        assert!(cache.get(root, Section::Annex, path, t0).is_none());
        assert!(cache.get(root, Section::Module, path, t0).is_some());
    }

    #[test]
    fn test_invalidate_clears_entries() {
        let cache = DocumentCache::new();
        let t0 = SystemTime::UNIX_EPOCH;
        cache.insert(Path::new("/a"), Section::Annex, Path::new("x.md"), t0, document("x"));
        assert_eq!(cache.len(), 1);

        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
