//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Escape text for use in HTML content and double-quoted attributes.
///
/// # Examples
///
/// ```
/// use quill_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert text to a URL-safe anchor slug.
///
/// Alphanumeric characters are lowercased and kept; every other run of
/// characters collapses into a single hyphen.
///
/// # Examples
///
/// ```
/// use quill_renderer::slugify;
///
/// assert_eq!(slugify("Gradient Descent (SGD)"), "gradient-descent-sgd");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Anchor id of a glossary term.
///
/// Shared by the `glossary` directive and the `{term}` role so that
/// references always land on the definition.
pub(crate) fn glossary_anchor(term: &str) -> String {
    format!("term-{}", slugify(term))
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Strip one level of common leading indentation from a block of lines.
pub(crate) fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}
