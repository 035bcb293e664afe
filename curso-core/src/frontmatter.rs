//! Front-matter parsing from markdown files.

use crate::metadata::PartialMetadata;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A\x{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n(.*)|\z)")
            .expect("valid frontmatter regex")
    })
}

/// Split a leading `---` delimited block from the markdown body.
///
/// Returns `(Some(yaml), body)` when a block is present and `(None, raw)`
/// otherwise.
///
/// ```
/// use curso_core::frontmatter::split_frontmatter;
///
/// let (yaml, body) = split_frontmatter("---\ntitle: Hola\n---\n# Cuerpo\n");
/// assert_eq!(yaml, Some("title: Hola"));
/// assert_eq!(body, "# Cuerpo\n");
/// ```
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    match frontmatter_regex().captures(raw) {
        Some(captures) => {
            let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            let body = captures.get(2).map(|m| m.as_str()).unwrap_or("");
            (Some(yaml), body)
        }
        None => (None, raw),
    }
}

/// Deserialize a front-matter YAML block.
pub fn parse_frontmatter_yaml(yaml: &str) -> Result<PartialMetadata, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(PartialMetadata::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse the authored metadata of a document and return it with the body.
///
/// Broken front-matter is not an error: it is logged and treated as absent,
/// so the caller falls back to derived metadata.
pub fn parse_metadata(raw: &str) -> (PartialMetadata, &str) {
    let (yaml, body) = split_frontmatter(raw);
    let Some(yaml) = yaml else {
        return (PartialMetadata::default(), body);
    };

    match parse_frontmatter_yaml(yaml) {
        Ok(partial) => (partial, body),
        Err(err) => {
            tracing::warn!("Ignoring unreadable front-matter: {}", err);
            (PartialMetadata::default(), body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_frontmatter() {
        let content = r#"---
title: Variables y tipos
description: Tipos basicos de Python
order: 2
keywords:
  - int
  - str
---

# Variables

Contenido."#;

        let (meta, body) = parse_metadata(content);
        assert_eq!(meta.title.as_deref(), Some("Variables y tipos"));
        assert_eq!(meta.description.as_deref(), Some("Tipos basicos de Python"));
        assert_eq!(meta.order, Some(2));
        assert_eq!(meta.keywords, Some(vec!["int".to_string(), "str".to_string()]));
        assert!(body.contains("# Variables"));
        assert!(!body.contains("order: 2"));
    }

    #[test]
    fn test_parse_minimal_frontmatter() {
        let content = "---\ntitle: Solo titulo\n---\nCuerpo.";
        let (meta, body) = parse_metadata(content);
        assert_eq!(meta.title.as_deref(), Some("Solo titulo"));
        assert_eq!(meta.description, None);
        assert_eq!(meta.order, None);
        assert_eq!(body, "Cuerpo.");
    }

    #[test]
    fn test_keywords_accepts_single_string() {
        let content = "---\nkeywords: pytest\n---\nCuerpo.";
        let (meta, _) = parse_metadata(content);
        assert_eq!(meta.keywords, Some(vec!["pytest".to_string()]));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Solo contenido\n\nSin metadatos.";
        let (meta, body) = parse_metadata(content);
        assert_eq!(meta, PartialMetadata::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let (yaml, body) = split_frontmatter("---\n---\n# Titulo\n");
        assert_eq!(yaml, Some(""));
        assert_eq!(body, "# Titulo\n");

        let (meta, _) = parse_metadata("---\n---\n# Titulo\n");
        assert_eq!(meta, PartialMetadata::default());
    }

    #[test]
    fn test_frontmatter_without_trailing_body() {
        let (yaml, body) = split_frontmatter("---\ntitle: Vacio\n---");
        assert_eq!(yaml, Some("title: Vacio"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_invalid_yaml_degrades_to_default() {
        let content = "---\ntitle: Roto\nkeywords: [sin cerrar\n---\n\n# Titulo real\n";
        assert!(parse_frontmatter_yaml("title: Roto\nkeywords: [sin cerrar").is_err());

        let (meta, body) = parse_metadata(content);
        assert_eq!(meta, PartialMetadata::default());
        assert!(body.contains("# Titulo real"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let content = "---\ntitle: Extra\nauthor: Alguien\n---\nCuerpo.";
        let (meta, _) = parse_metadata(content);
        assert_eq!(meta.title.as_deref(), Some("Extra"));
    }

    #[test]
    fn test_windows_line_endings() {
        let content = "---\r\ntitle: CRLF\r\n---\r\nCuerpo.";
        let (meta, body) = parse_metadata(content);
        assert_eq!(meta.title.as_deref(), Some("CRLF"));
        assert_eq!(body, "Cuerpo.");
    }
}
