//! Markdown compilation: rendered HTML plus the heading outline.

pub mod details;
pub mod highlight;

use crate::models::Heading;
use crate::slug::{slugify, Slugger};
use highlight::html_escape;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::ops::RangeInclusive;

pub use highlight::HighlightTransformer;

/// Heading levels listed in a document's table of contents
pub const TOC_LEVELS: RangeInclusive<u8> = 2..=4;

/// Id base for headings whose text has no sluggable characters
const FALLBACK_HEADING_ID: &str = "heading";

#[derive(Debug, Clone)]
struct OutlineEntry {
    level: u8,
    text: String,
    id: Option<String>,
}

/// Output of compiling one document body
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Markdown processor with the course site's extensions
#[derive(Debug, Clone, Copy)]
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Compile a markdown body into HTML and its table of contents.
    ///
    /// Every heading receives an id from a single slugger pass, so the ids in
    /// `headings` always match the anchors in `html`.
    pub fn compile(&self, body: &str) -> CompiledMarkdown {
        let source = details::split_details_blocks(body);
        let events: Vec<Event> = Parser::new_ext(&source, self.options).collect();

        let outline = collect_outline(&events);

        let events = attach_heading_ids(events, &outline);
        let events = add_heading_anchors(events);
        let events = HighlightTransformer::new().transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        CompiledMarkdown {
            html: html_output,
            headings: toc_from_outline(outline),
        }
    }

    /// Table of contents only, without rendering HTML
    pub fn extract_headings(&self, body: &str) -> Vec<Heading> {
        let source = details::split_details_blocks(body);
        let events: Vec<Event> = Parser::new_ext(&source, self.options).collect();
        toc_from_outline(collect_outline(&events))
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the level 2-4 headings of a markdown body.
///
/// ```
/// use curso_core::markdown::extract_headings;
///
/// let headings = extract_headings("# Titulo\n\n## Variables\n\n## Variables\n");
/// let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
/// assert_eq!(ids, ["variables", "variables-1"]);
/// ```
pub fn extract_headings(body: &str) -> Vec<Heading> {
    MarkdownProcessor::new().extract_headings(body)
}

fn collect_outline(events: &[Event]) -> Vec<OutlineEntry> {
    let mut slugger = Slugger::new();
    let mut outline = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim().to_string();
                    let id = (!text.is_empty()).then(|| {
                        if slugify(&text).is_empty() {
                            slugger.slug(FALLBACK_HEADING_ID)
                        } else {
                            slugger.slug(&text)
                        }
                    });
                    outline.push(OutlineEntry { level, text, id });
                }
            }
            _ => {}
        }
    }

    outline
}

fn toc_from_outline(outline: Vec<OutlineEntry>) -> Vec<Heading> {
    outline
        .into_iter()
        .filter(|entry| TOC_LEVELS.contains(&entry.level) && !entry.text.is_empty())
        .filter_map(|entry| {
            entry.id.map(|id| Heading {
                id,
                text: entry.text,
                level: entry.level,
            })
        })
        .collect()
}

fn attach_heading_ids<'a>(events: Vec<Event<'a>>, outline: &[OutlineEntry]) -> Vec<Event<'a>> {
    let mut entries = outline.iter();

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let generated = entries.next().and_then(|entry| entry.id.clone());
                let id = id.or_else(|| generated.map(|s| CowStr::Boxed(s.into_boxed_str())));
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            other => other,
        })
        .collect()
}

fn add_heading_anchors(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut result = Vec::with_capacity(events.len());
    let mut current_id: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                current_id = id.as_ref().map(|s| s.to_string());
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(id) = current_id.take() {
                    let anchor = format!(
                        "<a class=\"heading-anchor\" href=\"#{}\" aria-hidden=\"true\" tabindex=\"-1\">#</a>",
                        html_escape(&id)
                    );
                    result.push(Event::InlineHtml(CowStr::Boxed(anchor.into_boxed_str())));
                }
                result.push(Event::End(TagEnd::Heading(level)));
            }
            other => result.push(other),
        }
    }

    result
}
