//! Inline math and equation references in prose.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::EquationRegistry;
use crate::regions::{code_spans, literal_code_spans, map_between};
use crate::util::escape_html;

/// `{eq}`label``, `[](#label)` and `{math}`tex``.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{eq\}`([^`\n]+)`|\[\]\(#([^)\s]+)\)|\{math\}`([^`\n]+)`").unwrap()
});

/// Resolve equation references and render inline math in a prose chunk.
///
/// Inline code spans are copied unchanged.
pub(super) fn resolve_prose(
    text: &str,
    registry: &EquationRegistry,
    warnings: &mut Vec<String>,
) -> String {
    map_between(text, &literal_code_spans(text), |chunk| {
        let resolved = resolve_references(chunk, registry, warnings);
        map_between(&resolved, &code_spans(&resolved), replace_dollars)
    })
}

fn resolve_references(
    text: &str,
    registry: &EquationRegistry,
    warnings: &mut Vec<String>,
) -> String {
    REFERENCE.replace_all(text, |caps: &Captures<'_>| {
        if let Some(label) = caps.get(1) {
            let label = label.as_str().trim();
            if registry.get(label).is_none() {
                tracing::warn!(label, "Unresolved equation reference");
                warnings.push(format!("Unresolved equation reference '{label}'"));
            }
            equation_ref(label, registry)
        } else if let Some(label) = caps.get(2) {
            equation_ref(label.as_str(), registry)
        } else {
            caps.get(3)
                .map_or_else(String::new, |tex| inline_math(tex.as_str()))
        }
    })
    .into_owned()
}

/// Link to a numbered equation, or a pending marker for unknown labels.
fn equation_ref(label: &str, registry: &EquationRegistry) -> String {
    match registry.get(label) {
        Some(equation) => format!(
            r##"<a class="equation-ref" href="#{}">({})</a>"##,
            escape_html(&equation.id),
            equation.number
        ),
        None => {
            let label = escape_html(label);
            format!(
                r##"<a class="equation-ref equation-ref-pending" href="#{label}" data-label="{label}">({label})</a>"##
            )
        }
    }
}

/// Inline math span.
///
/// The LaTeX passes through the markdown renderer as text, so every ASCII
/// punctuation character is backslash-escaped to reach the page literally.
pub(crate) fn inline_math(tex: &str) -> String {
    let delimited = format!("\\({}\\)", tex.trim());
    let mut escaped = String::with_capacity(delimited.len() * 2);
    for c in delimited.chars() {
        if c.is_ascii_punctuation() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!(r#"<span class="math-inline">{escaped}</span>"#)
}

fn replace_dollars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in dollar_spans(text) {
        out.push_str(&text[last..span.start]);
        out.push_str(&inline_math(&text[span.start + 1..span.end - 1]));
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Byte ranges of `$...$` inline math, delimiters included.
///
/// A `$` escaped with a backslash is literal. The opening `$` must be
/// followed by a non-space; the closing `$` must follow a non-space and
/// must not be followed by a digit, so prices like `$5 and $10` stay text.
/// Math never spans lines.
pub(crate) fn dollar_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' || (i > 0 && bytes[i - 1] == b'\\') {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'$') {
            i += 2;
            continue;
        }
        if bytes.get(i + 1).is_none_or(u8::is_ascii_whitespace) {
            i += 1;
            continue;
        }

        match find_closing(bytes, i + 1) {
            Some(close) => {
                spans.push(i..close + 1);
                i = close + 1;
            }
            None => i += 1,
        }
    }

    spans
}

fn find_closing(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from + 1;
    while j < bytes.len() && bytes[j] != b'\n' {
        if bytes[j] == b'$'
            && bytes[j - 1] != b'\\'
            && !bytes[j - 1].is_ascii_whitespace()
            && !bytes.get(j + 1).is_some_and(u8::is_ascii_digit)
        {
            return Some(j);
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn prose(text: &str, registry: &EquationRegistry) -> String {
        let mut warnings = Vec::new();
        resolve_prose(text, registry, &mut warnings)
    }

    #[test]
    fn test_inline_math_escapes_punctuation() {
        assert_eq!(
            inline_math("a_1"),
            r#"<span class="math-inline">\\\(a\_1\\\)</span>"#
        );
    }

    #[test]
    fn test_dollar_math() {
        let out = prose("Let $x$ be", &EquationRegistry::new());
        assert_eq!(
            out,
            r#"Let <span class="math-inline">\\\(x\\\)</span> be"#
        );
    }

    #[test]
    fn test_prices_are_not_math() {
        let text = "costs $5 and $10 today";
        assert_eq!(prose(text, &EquationRegistry::new()), text);
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        let text = r"a \$x\$ b";
        assert_eq!(prose(text, &EquationRegistry::new()), text);
    }

    #[test]
    fn test_dollar_in_code_span_untouched() {
        let text = "use `$x$` here";
        assert_eq!(prose(text, &EquationRegistry::new()), text);
    }

    #[test]
    fn test_math_role() {
        let out = prose("{math}`y`", &EquationRegistry::new());
        assert_eq!(out, r#"<span class="math-inline">\\\(y\\\)</span>"#);
    }

    #[test]
    fn test_resolved_reference() {
        let mut registry = EquationRegistry::new();
        registry.number("eq1").unwrap();
        assert_eq!(
            prose("see {eq}`eq1` and [](#eq1)", &registry),
            r##"see <a class="equation-ref" href="#eq1">(1)</a> and <a class="equation-ref" href="#eq1">(1)</a>"##
        );
    }

    #[test]
    fn test_references_in_inline_code_untouched() {
        let mut warnings = Vec::new();
        let text = "Write `[](#eq-a)` or ``{eq}`eq-a` `` to cite.";
        let out = resolve_prose(text, &EquationRegistry::new(), &mut warnings);
        assert_eq!(out, text);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_dollar_spans() {
        let text = "a $x$ costs $5 and $10.";
        let spans: Vec<&str> = dollar_spans(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(spans, vec!["$x$"]);
    }

    #[test]
    fn test_pending_reference() {
        let mut warnings = Vec::new();
        let out = resolve_prose("{eq}`nope`", &EquationRegistry::new(), &mut warnings);
        assert_eq!(
            out,
            r##"<a class="equation-ref equation-ref-pending" href="#nope" data-label="nope">(nope)</a>"##
        );
        assert_eq!(warnings.len(), 1);
    }
}
