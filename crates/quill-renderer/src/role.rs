//! Inline roles: `` {name}`text` `` and `` {name}`text <target>` ``.
//!
//! Roles are resolved line-locally on markdown text. Code (fenced, inline
//! or in verbatim directives) is left alone, and unknown roles stay as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::regions::{literal_code_spans, map_between, map_unprotected};
use crate::util::{escape_html, glossary_anchor};

static ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z][\w:+\-]*)\}`([^`\n]+)`").unwrap());

/// `text <target>` role content.
static TARGETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*<([^<>]+)>$").unwrap());

/// `TEXT (expansion)` content of `{abbr}`.
static ABBR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\(([^()]+)\)$").unwrap());

/// Resolve every known role in `text`.
pub(crate) fn resolve(text: &str) -> String {
    if !text.contains("}`") {
        return text.to_owned();
    }
    map_unprotected(text, |block| {
        map_between(block, &literal_code_spans(block), |chunk| {
            ROLE.replace_all(chunk, |caps: &Captures<'_>| {
                render_role(&caps[1], &caps[2]).unwrap_or_else(|| caps[0].to_owned())
            })
            .into_owned()
        })
    })
}

/// Split `text <target>` into its parts.
fn split_target(content: &str) -> (&str, Option<&str>) {
    TARGETED
        .captures(content)
        .and_then(|caps| Some((caps.get(1)?.as_str(), Some(caps.get(2)?.as_str().trim()))))
        .unwrap_or((content, None))
}

fn render_role(name: &str, content: &str) -> Option<String> {
    let html = match name {
        "button" => {
            let (text, target) = split_target(content);
            match target {
                Some(url) => {
                    let label = if text.is_empty() { url } else { text };
                    format!(
                        r#"<a class="button" href="{}">{}</a>"#,
                        escape_html(url),
                        escape_html(label)
                    )
                }
                None => format!(r#"<span class="button">{}</span>"#, escape_html(text)),
            }
        }
        "term" => {
            let (text, target) = split_target(content);
            let term = target.unwrap_or(text);
            let label = if text.is_empty() { term } else { text };
            format!(
                r##"<a class="glossary-term" href="#{}">{}</a>"##,
                glossary_anchor(term),
                escape_html(label)
            )
        }
        "ref" => {
            let (text, target) = split_target(content);
            let label = target.unwrap_or(text);
            let shown = if text.is_empty() { label } else { text };
            format!(
                r##"<a class="reference" href="#{}">{}</a>"##,
                escape_html(label),
                escape_html(shown)
            )
        }
        "sub" | "subscript" => format!("<sub>{}</sub>", escape_html(content)),
        "sup" | "superscript" => format!("<sup>{}</sup>", escape_html(content)),
        "del" | "strike" => format!("<del>{}</del>", escape_html(content)),
        "u" | "underline" => format!("<u>{}</u>", escape_html(content)),
        "sc" | "smallcaps" => format!(r#"<span class="smallcaps">{}</span>"#, escape_html(content)),
        "kbd" => render_kbd(content),
        "abbr" => match ABBR.captures(content) {
            Some(caps) => format!(
                r#"<abbr title="{}">{}</abbr>"#,
                escape_html(caps[2].trim()),
                escape_html(&caps[1])
            ),
            None => format!("<abbr>{}</abbr>", escape_html(content)),
        },
        _ => return None,
    };
    Some(html)
}

/// `Ctrl+C` becomes one `<kbd>` per key inside a compound `<kbd>`.
fn render_kbd(content: &str) -> String {
    let keys: Vec<&str> = content
        .split('+')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .collect();

    if keys.len() <= 1 {
        return format!("<kbd>{}</kbd>", escape_html(content.trim()));
    }

    let inner: Vec<String> = keys
        .iter()
        .map(|key| format!("<kbd>{}</kbd>", escape_html(key)))
        .collect();
    format!(r#"<kbd class="kbd">{}</kbd>"#, inner.join("+"))
}
