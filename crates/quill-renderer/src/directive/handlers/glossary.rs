//! Glossary definition lists.
//!
//! ```markdown
//! :::{glossary}
//! Gradient
//!   Vector of partial derivatives.
//!
//! Learning rate
//!   Step size of each update.
//! :::
//! ```
//!
//! Unindented lines are terms, indented lines define the terms above them.
//! Each term gets the anchor used by the `{term}` role.

use std::fmt::Write;

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};
use crate::util::{dedent, glossary_anchor};

use super::inline_title;

#[derive(Default)]
struct Entry<'a> {
    terms: Vec<&'a str>,
    definition: Vec<&'a str>,
}

pub struct Glossary;

impl BlockDirective for Glossary {
    fn name(&self) -> &'static str {
        "glossary"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let entries = parse_entries(&node.body);
        if entries.is_empty() {
            ctx.warn("glossary without entries");
        }

        let mut html = format!(
            "<dl class=\"glossary{}\"{}>",
            node.extra_classes(),
            node.id_attr()
        );
        for entry in &entries {
            for term in &entry.terms {
                let _ = write!(
                    html,
                    "\n<dt id=\"{}\">{}</dt>",
                    glossary_anchor(term),
                    inline_title(term)
                );
            }
            let definition = dedent(&entry.definition.join("\n"));
            let definition = definition.trim_matches('\n');
            if definition.is_empty() {
                html.push_str("\n<dd></dd>");
            } else {
                let _ = write!(html, "\n<dd>\n\n{definition}\n\n</dd>");
            }
        }
        html.push_str("\n</dl>");

        DirectiveOutput::html(html)
    }
}

fn parse_entries(body: &str) -> Vec<Entry<'_>> {
    let mut entries: Vec<Entry<'_>> = Vec::new();

    for line in body.lines() {
        let indented = line.starts_with(' ') || line.starts_with('\t');
        if line.trim().is_empty() {
            if let Some(entry) = entries.last_mut()
                && !entry.definition.is_empty()
            {
                entry.definition.push("");
            }
        } else if indented {
            match entries.last_mut() {
                Some(entry) => entry.definition.push(line),
                // Definition before any term: keep it as a term-less entry.
                None => entries.push(Entry {
                    terms: Vec::new(),
                    definition: vec![line],
                }),
            }
        } else {
            match entries.last_mut() {
                Some(entry) if entry.definition.is_empty() => entry.terms.push(line.trim()),
                _ => entries.push(Entry {
                    terms: vec![line.trim()],
                    definition: Vec::new(),
                }),
            }
        }
    }

    entries
}
