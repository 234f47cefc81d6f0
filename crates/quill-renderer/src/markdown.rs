//! Final markdown pass.
//!
//! Everything earlier in the pipeline leaves HTML blocks surrounded by
//! blank lines, so pulldown-cmark passes them through untouched and
//! renders the markdown in between.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::util::{heading_level_to_num, slugify};

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (2 or 3).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Result of the markdown pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct MarkdownOutput {
    pub html: String,
    /// Text of the first H1.
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
}

/// GFM tables, strikethrough, task lists and alerts.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Heading IDs, unique within one document.
#[derive(Default)]
struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    fn generate(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("section");
        }
        let count = self.counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }
}

/// Render markdown to HTML.
///
/// Headings get slug IDs, `h2`/`h3` headings are collected into the table
/// of contents and tables are optionally wrapped in a scroll container.
pub(crate) fn render(markdown: &str, wrap_tables: bool) -> MarkdownOutput {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut ids = HeadingIds::default();
    let mut title = None;
    let mut toc = Vec::new();
    // Index of the open heading's start event, its level and its text.
    let mut heading: Option<(usize, u8, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((events.len(), heading_level_to_num(*level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buffer)) = heading.as_mut() {
                    buffer.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, level, text)) = heading.take() {
                    let text = text.trim().to_owned();
                    let id = ids.generate(&text);
                    if let Some(Event::Start(Tag::Heading { id: slot, .. })) = events.get_mut(start)
                    {
                        *slot = Some(CowStr::from(id.clone()));
                    }
                    match level {
                        1 if title.is_none() => title = Some(text),
                        2 | 3 => toc.push(TocEntry {
                            level,
                            title: text,
                            id,
                        }),
                        _ => {}
                    }
                }
            }
            Event::Start(Tag::Table(_)) if wrap_tables => {
                events.push(Event::Html(CowStr::Borrowed("<div class=\"table-wrapper\">\n")));
            }
            _ => {}
        }

        let closes_table = wrap_tables && matches!(event, Event::End(TagEnd::Table));
        events.push(event);
        if closes_table {
            events.push(Event::Html(CowStr::Borrowed("</div>\n")));
        }
    }

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());

    MarkdownOutput {
        html: output,
        title,
        toc,
    }
}

/// Render a single line of markdown without the paragraph wrapper.
pub(crate) fn render_inline(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 16);
    html::push_html(&mut output, Parser::new_ext(text.trim(), parser_options()));

    let trimmed = output.trim_end();
    trimmed
        .strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
        .unwrap_or(trimmed)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_paragraph() {
        assert_eq!(render("Hello **world**", true).html, "<p>Hello <strong>world</strong></p>\n");
    }

    #[test]
    fn test_heading_ids_and_toc() {
        let output = render("# Title\n\n## Intro\n\n## Intro\n\n### Sub `code`\n\n#### Deep", true);
        assert_eq!(output.title.as_deref(), Some("Title"));
        assert!(output.html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(output.html.contains("<h2 id=\"intro-1\">Intro</h2>"));
        assert_eq!(
            output.toc,
            vec![
                TocEntry {
                    level: 2,
                    title: "Intro".to_owned(),
                    id: "intro".to_owned()
                },
                TocEntry {
                    level: 2,
                    title: "Intro".to_owned(),
                    id: "intro-1".to_owned()
                },
                TocEntry {
                    level: 3,
                    title: "Sub code".to_owned(),
                    id: "sub-code".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_table_wrapped() {
        let output = render("| a | b |\n|---|---|\n| 1 | 2 |", true);
        assert!(output.html.starts_with("<div class=\"table-wrapper\">\n<table>"));
        assert!(output.html.contains("</table>\n</div>"));
    }

    #[test]
    fn test_table_not_wrapped() {
        let output = render("| a | b |\n|---|---|\n| 1 | 2 |", false);
        assert!(output.html.starts_with("<table>"));
        assert!(!output.html.contains("table-wrapper"));
    }

    #[test]
    fn test_raw_html_block_passthrough() {
        let output = render("<div class=\"note\">\n\n*body*\n\n</div>", true);
        assert_eq!(
            output.html.trim_end(),
            "<div class=\"note\">\n<p><em>body</em></p>\n</div>"
        );
    }

    #[test]
    fn test_strikethrough_and_tasks() {
        let output = render("~~old~~\n\n- [x] done", true);
        assert!(output.html.contains("<del>old</del>"));
        assert!(output.html.contains("checked"));
    }

    #[test]
    fn test_render_inline() {
        assert_eq!(render_inline("Mind the *gap*"), "Mind the <em>gap</em>");
        assert_eq!(render_inline("plain"), "plain");
        assert_eq!(render_inline(""), "");
    }
}
