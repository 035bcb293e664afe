//! Slug generation for file names and heading anchors.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();
static ORDER_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn extension_regex() -> &'static Regex {
    EXTENSION_REGEX.get_or_init(|| Regex::new(r"\.mdx?$").expect("valid extension regex"))
}

fn order_prefix_regex() -> &'static Regex {
    ORDER_PREFIX_REGEX.get_or_init(|| Regex::new(r"^\d+-").expect("valid prefix regex"))
}

/// Derive a document slug from its file name.
///
/// The Markdown extension and a leading `NN-` ordering prefix are removed;
/// nothing else is rewritten, so the mapping is stable across builds.
///
/// ```
/// use curso_core::slug::slug_from_filename;
///
/// assert_eq!(slug_from_filename("03-funciones.md"), "funciones");
/// assert_eq!(slug_from_filename("proyecto-final.mdx"), "proyecto-final");
/// ```
pub fn slug_from_filename(file_name: &str) -> String {
    let stem = extension_regex().replace(file_name, "");
    let slug = order_prefix_regex().replace(&stem, "");
    if slug.is_empty() {
        stem.into_owned()
    } else {
        slug.into_owned()
    }
}

/// Leading digit run of a file name (`"10-pruebas.md"` -> `Some(10)`).
pub fn leading_number(file_name: &str) -> Option<u64> {
    let digits: String = file_name.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Convert heading text to an anchor slug.
///
/// Rules:
/// - Lowercase
/// - Spaces become hyphens (runs are not collapsed)
/// - Anything that is not a letter, digit, hyphen or underscore is dropped
///
/// # Examples
///
/// ```
/// use curso_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("¿Qué es Python?"), "qué-es-python");
/// assert_eq!(slugify("C++ y Python"), "c-y-python");
/// ```
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c == ' ' {
                Some("-")
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(g)
            } else {
                None
            }
        })
        .collect()
}

/// Stateful slugger that keeps ids unique within one document.
///
/// Repeated slugs get a numeric suffix: `variables`, `variables-1`,
/// `variables-2`, ...
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `value`, appending a suffix if the result was already handed out.
    pub fn slug(&mut self, value: &str) -> String {
        let original = slugify(value);
        let mut result = original.clone();

        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{}-{}", original, count);
        }

        self.occurrences.insert(result.clone(), 0);
        result
    }

    /// Forget every slug handed out so far.
    pub fn reset(&mut self) {
        self.occurrences.clear();
    }
}
