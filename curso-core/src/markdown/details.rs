//! Normalization of collapsible `<details>` blocks.
//!
//! Course material writes exercise solutions as
//! `<details><summary>Solucion</summary>` followed by Markdown. CommonMark
//! swallows everything up to the next blank line into the HTML block, so the
//! tags are moved onto their own paragraphs before parsing.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static DETAILS_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn details_open_regex() -> &'static Regex {
    DETAILS_OPEN_REGEX.get_or_init(|| {
        Regex::new(r"<details>\s*<summary>([^<]+)</summary>").expect("valid details regex")
    })
}

pub fn split_details_blocks(body: &str) -> Cow<'_, str> {
    if !body.contains("<details") {
        return Cow::Borrowed(body);
    }

    let opened = details_open_regex().replace_all(body, "\n<details>\n<summary>${1}</summary>\n\n");
    Cow::Owned(opened.replace("</details>", "\n\n</details>\n\n"))
}
