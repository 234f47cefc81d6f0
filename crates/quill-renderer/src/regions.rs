//! Protected text regions.
//!
//! Text passes that run before the markdown renderer must leave code alone:
//! fenced code blocks, verbatim directives (`code`, `mermaid`, ...) and,
//! for most passes, inline code spans.

use std::ops::Range;

use crate::fence::{LineIndex, Segment, walk};

/// Directives whose body is reproduced literally.
pub(crate) const VERBATIM_DIRECTIVES: &[&str] = &["code", "code-block", "sourcecode", "mermaid"];

/// Check if a directive body must not be transformed.
pub(crate) fn is_verbatim(name: &str) -> bool {
    VERBATIM_DIRECTIVES.contains(&name)
}

/// Byte ranges of fenced code blocks and verbatim directives, in order.
pub(crate) fn protected_regions(text: &str) -> Vec<Range<usize>> {
    protected_regions_where(text, is_verbatim)
}

/// Byte ranges of fenced code blocks and of directives selected by `protect`.
pub(crate) fn protected_regions_where(
    text: &str,
    protect: impl Fn(&str) -> bool,
) -> Vec<Range<usize>> {
    let index = LineIndex::new(text);

    walk(&index.lines, protect)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Code { start, end } => Some(index.byte_range(start, end)),
            Segment::Directive(block) => Some(index.byte_range(block.start, block.end)),
            Segment::Line(_) | Segment::Unclosed { .. } => None,
        })
        .collect()
}

/// Byte ranges of inline code spans.
///
/// A span opens with a run of backticks and closes with the next run of the
/// same length. Spans never cross a blank line; an opener without a closer
/// is literal text.
pub(crate) fn code_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some((open_start, open_len)) = next_backtick_run(bytes, pos) {
        let mut search = open_start + open_len;
        let mut close = None;

        while let Some((run_start, run_len)) = next_backtick_run(bytes, search) {
            if text[open_start + open_len..run_start].contains("\n\n") {
                break;
            }
            if run_len == open_len {
                close = Some(run_start + run_len);
                break;
            }
            search = run_start + run_len;
        }

        if let Some(end) = close {
            spans.push(open_start..end);
            pos = end;
        } else {
            pos = open_start + open_len;
        }
    }

    spans
}

/// Inline code spans that are code, not the content of a `` {role}`...` ``.
pub(crate) fn literal_code_spans(text: &str) -> Vec<Range<usize>> {
    code_spans(text)
        .into_iter()
        .filter(|span| {
            let single = text.as_bytes().get(span.start + 1) != Some(&b'`');
            !(single && follows_role_name(&text[..span.start]))
        })
        .collect()
}

/// Check if `prefix` ends with `{name}`.
fn follows_role_name(prefix: &str) -> bool {
    let Some(rest) = prefix.strip_suffix('}') else {
        return false;
    };
    let Some(open) = rest.rfind('{') else {
        return false;
    };
    let name = &rest[open + 1..];
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '+' | '-'))
}

fn next_backtick_run(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let start = from + bytes.get(from..)?.iter().position(|&b| b == b'`')?;
    let len = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    Some((start, len))
}

/// Apply `f` to the text between `ranges`, copying the ranges unchanged.
///
/// `ranges` must be sorted and non-overlapping.
pub(crate) fn map_between(
    text: &str,
    ranges: &[Range<usize>],
    mut f: impl FnMut(&str) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for range in ranges {
        out.push_str(&f(&text[last..range.start]));
        out.push_str(&text[range.clone()]);
        last = range.end;
    }
    out.push_str(&f(&text[last..]));

    out
}

/// Apply `f` outside fenced code and verbatim directives.
pub(crate) fn map_unprotected(text: &str, f: impl FnMut(&str) -> String) -> String {
    map_between(text, &protected_regions(text), f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_regions_code_fence() {
        let text = "a\n```\ncode\n```\nb";
        let regions = protected_regions(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(&text[regions[0].clone()], "```\ncode\n```");
    }

    #[test]
    fn test_protected_regions_verbatim_directive() {
        let text = "a\n```{mermaid}\ngraph TD\n```\nb";
        let regions = protected_regions(text);
        assert_eq!(&text[regions[0].clone()], "```{mermaid}\ngraph TD\n```");
    }

    #[test]
    fn test_protected_regions_skip_other_directives() {
        let text = ":::{note}\nHello\n:::";
        assert!(protected_regions(text).is_empty());
    }

    #[test]
    fn test_code_spans() {
        let text = "use `x` and ``a ` b`` here";
        let spans: Vec<&str> = code_spans(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(spans, vec!["`x`", "``a ` b``"]);
    }

    #[test]
    fn test_literal_code_spans_skip_role_content() {
        let text = "{kbd}`Ctrl` and `[](#x)` and ``{eq}`a` ``";
        let spans: Vec<&str> = literal_code_spans(text)
            .into_iter()
            .map(|r| &text[r])
            .collect();
        assert_eq!(spans, vec!["`[](#x)`", "``{eq}`a` ``"]);
    }

    #[test]
    fn test_code_span_unclosed() {
        assert!(code_spans("a ` b").is_empty());
    }

    #[test]
    fn test_code_span_not_across_blank_line() {
        assert!(code_spans("a `b\n\nc` d").is_empty());
    }

    #[test]
    fn test_map_unprotected_skips_code_blocks() {
        let text = "x `x` x\n```\nx\n```\nx";
        let out = map_unprotected(text, |chunk| chunk.replace('x', "y"));
        assert_eq!(out, "y `y` y\n```\nx\n```\ny");
    }
}
