//! Math resolution.
//!
//! Display equations come in several syntaxes:
//!
//! - fenced `math` directives with `:label:` and `:enumerated:` options
//! - `$$ ... $$ (label)`
//! - AMS environments (`equation`, `align`, ...) with `\label{...}`
//! - `$$ ... $$`, optionally with `\label{...}`
//!
//! All of them become a single `equation-block` structure. Labeled
//! equations are numbered from 1 in document order regardless of syntax,
//! after which `{eq}` references, `{math}` roles and inline `$...$` are
//! resolved in the surrounding prose.

mod collect;
mod inline;
mod registry;

use std::fmt::Write;
use std::ops::Range;

pub(crate) use inline::dollar_spans;
pub use registry::{DuplicateLabel, Equation, EquationRegistry};

/// AMS display environments, as a regex alternation.
pub(crate) const AMS_ENVIRONMENTS: &str = "equation|align|gather|multline|alignat|split|eqnarray";

use crate::util::escape_html;
use collect::Definition;

/// Render display equations and resolve math in prose.
///
/// Code blocks and verbatim directives are copied unchanged.
pub(crate) fn resolve(
    text: &str,
    registry: &mut EquationRegistry,
    warnings: &mut Vec<String>,
) -> String {
    let collected = collect::collect(text);

    // Numbering happens before any prose is touched so that references
    // ahead of their equation resolve too.
    let mut blocks: Vec<(Range<usize>, Option<String>)> = collected
        .definitions
        .iter()
        .map(|def| (def.range.clone(), Some(render_block(def, registry, warnings))))
        .chain(collected.protected.into_iter().map(|range| (range, None)))
        .collect();
    blocks.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, replacement) in blocks {
        out.push_str(&inline::resolve_prose(&text[last..range.start], registry, warnings));
        match replacement {
            Some(html) => out.push_str(&html),
            None => out.push_str(&text[range.clone()]),
        }
        last = range.end;
    }
    out.push_str(&inline::resolve_prose(&text[last..], registry, warnings));

    out
}

/// Register the equation's label and render its block.
fn render_block(
    def: &Definition,
    registry: &mut EquationRegistry,
    warnings: &mut Vec<String>,
) -> String {
    let mut anchor = None;
    let mut number = None;

    if let Some(label) = &def.label {
        let assigned = if def.enumerated {
            registry.number(label).map(|equation| Some(equation.number))
        } else {
            registry.reserve(label).map(|()| None)
        };
        match assigned {
            Ok(n) => {
                anchor = Some(label.as_str());
                number = n;
            }
            Err(e) => {
                tracing::warn!(label = %label, "Duplicate equation label");
                warnings.push(format!("Equation rendered unnumbered: {e}"));
            }
        }
    }

    // A blank line would end the surrounding HTML block.
    let content = def
        .tex
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut html = String::from("\n\n<div class=\"equation-block\"");
    if let Some(anchor) = anchor {
        let _ = write!(html, r#" id="{}""#, escape_html(anchor));
    }
    let _ = write!(
        html,
        ">\n<div class=\"equation-content\">{}</div>",
        escape_html(&content)
    );
    if let Some(number) = number {
        let _ = write!(html, "\n<div class=\"equation-number\">({number})</div>");
    }
    html.push_str("\n</div>\n\n");
    html
}
