//! Document metadata: what authors write, and what the loader resolves.
//!
//! Resolution is a two-step pure pipeline. [`crate::frontmatter::parse_metadata`]
//! yields a [`PartialMetadata`] with whatever keys were present, and
//! [`resolve_metadata`] fills the gaps from the body and the file name.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// Title used when neither front-matter nor body provide one.
pub const UNTITLED: &str = "Sin título";

/// Metadata keys as authored in front-matter; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMetadata {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub order: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Option<Vec<String>>,
}

/// Fully resolved metadata; `title` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub order: i64,
    pub keywords: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Keywords {
    One(String),
    Many(Vec<String>),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Keywords>::deserialize(deserializer)?.map(|keywords| match keywords {
            Keywords::One(keyword) => vec![keyword],
            Keywords::Many(keywords) => keywords,
        }),
    )
}

static H1_REGEX: OnceLock<Regex> = OnceLock::new();
static ORDER_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn h1_regex() -> &'static Regex {
    H1_REGEX.get_or_init(|| Regex::new(r"^#[ \t]+(.+)$").expect("valid heading regex"))
}

fn order_token_regex() -> &'static Regex {
    ORDER_TOKEN_REGEX.get_or_init(|| Regex::new(r"\d+").expect("valid order regex"))
}

/// Fill in missing metadata from the body and file name.
///
/// - title: authored, else the first `# ` heading, else [`UNTITLED`]
/// - description: authored, else the first `# ` heading, else the resolved title
/// - order: authored, else the first number in the file name, else 0
/// - keywords: authored, else empty
pub fn resolve_metadata(partial: PartialMetadata, body: &str, file_name: &str) -> Metadata {
    let body_title = title_from_body(body);

    let title = partial
        .title
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string())
        .or_else(|| body_title.clone())
        .unwrap_or_else(|| UNTITLED.to_string());

    let description = partial
        .description
        .filter(|d| !d.trim().is_empty())
        .map(|d| d.trim().to_string())
        .or(body_title)
        .unwrap_or_else(|| title.clone());

    let order = partial
        .order
        .unwrap_or_else(|| order_from_filename(file_name));

    Metadata {
        title,
        description,
        order,
        keywords: partial.keywords.unwrap_or_default(),
    }
}

/// Text of the first level-1 ATX heading outside fenced code.
pub fn title_from_body(body: &str) -> Option<String> {
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some(captures) = h1_regex().captures(line.trim_end()) {
            let text = captures[1].trim().trim_end_matches('#').trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    None
}

/// First number embedded in a file name (`"modulo03-funciones.md"` -> 3).
pub fn order_from_filename(file_name: &str) -> i64 {
    order_token_regex()
        .find(file_name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
