//! Display equation discovery.
//!
//! Each syntax claims byte ranges of the text in priority order; later
//! syntaxes only search what earlier ones left unclaimed, so a labeled
//! `$$...$$ (label)` is never re-read as a plain `$$...$$` block.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::AMS_ENVIRONMENTS;
use crate::directive::split_options;
use crate::fence::{DirectiveBlock, LineIndex, Segment, walk};
use crate::regions::{code_spans, is_verbatim};

/// `$$ ... $$ (label)`.
static LABELED_DISPLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$((?:[^$]|\$[^$])+?)\$\$[ \t]*\(([^()\s]+)\)").unwrap()
});

/// `$$ ... $$`.
static DISPLAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$((?:[^$]|\$[^$])+?)\$\$").unwrap());

/// Opening of an AMS display environment.
static AMS_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\\begin\{{({AMS_ENVIRONMENTS})(\*?)\}}")).unwrap()
});

/// `\label{...}` inside math.
static LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\label\{([^}]*)\}").unwrap());

/// A display equation found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Definition {
    /// Byte range replaced by the rendered block.
    pub range: Range<usize>,
    pub label: Option<String>,
    /// Whether a labeled equation takes a number.
    pub enumerated: bool,
    /// Delimited LaTeX for the math renderer.
    pub tex: String,
}

/// Equations in document order, plus the code regions that were skipped.
pub(super) struct Collected {
    pub definitions: Vec<Definition>,
    pub protected: Vec<Range<usize>>,
}

type Pass = fn(&str, Range<usize>, &mut Vec<Definition>);

/// Find every display equation in `text`.
pub(super) fn collect(text: &str) -> Collected {
    let index = LineIndex::new(text);
    let mut protected = Vec::new();
    let mut definitions = Vec::new();

    for segment in walk(&index.lines, |name| name == "math" || is_verbatim(name)) {
        match segment {
            Segment::Code { start, end } => protected.push(index.byte_range(start, end)),
            Segment::Directive(block) if block.name == "math" => {
                definitions.push(directive_definition(&index, &block));
            }
            Segment::Directive(block) => protected.push(index.byte_range(block.start, block.end)),
            Segment::Line(_) | Segment::Unclosed { .. } => {}
        }
    }

    let mut claimed: Vec<Range<usize>> = protected
        .iter()
        .cloned()
        .chain(definitions.iter().map(|def: &Definition| def.range.clone()))
        .collect();
    claimed.sort_by_key(|range| range.start);

    let spans: Vec<Range<usize>> = unclaimed(text.len(), &claimed)
        .into_iter()
        .flat_map(|gap| {
            code_spans(&text[gap.clone()])
                .into_iter()
                .map(move |span| gap.start + span.start..gap.start + span.end)
        })
        .collect();
    claimed.extend(spans);
    claimed.sort_by_key(|range| range.start);

    let passes: [Pass; 3] = [labeled_display, ams_environment, display];
    for pass in passes {
        let mut found = Vec::new();
        for gap in unclaimed(text.len(), &claimed) {
            pass(text, gap, &mut found);
        }
        claimed.extend(found.iter().map(|def| def.range.clone()));
        claimed.sort_by_key(|range| range.start);
        definitions.extend(found);
    }

    definitions.sort_by_key(|def| def.range.start);

    Collected {
        definitions,
        protected,
    }
}

/// Complement of sorted, disjoint `claimed` ranges within `0..len`.
fn unclaimed(len: usize, claimed: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut gaps = Vec::with_capacity(claimed.len() + 1);
    let mut last = 0;
    for range in claimed {
        if range.start > last {
            gaps.push(last..range.start);
        }
        last = last.max(range.end);
    }
    if last < len {
        gaps.push(last..len);
    }
    gaps
}

/// ```` ```{math} ```` or `:::{math}` block with `:label:` / `:enumerated:` options.
fn directive_definition(index: &LineIndex<'_>, block: &DirectiveBlock<'_>) -> Definition {
    let content = index.lines[block.start + 1..block.end].join("\n");
    let (options, body) = split_options(&content);

    let mut math = String::new();
    if !block.argument.is_empty() {
        math.push_str(block.argument);
        math.push('\n');
    }
    math.push_str(body);

    let (math, inner_label) = take_label(&math);
    let label = options
        .get("label")
        .or_else(|| options.get("name"))
        .map(str::to_owned)
        .or(inner_label);

    Definition {
        range: index.byte_range(block.start, block.end),
        label,
        enumerated: options.flag("enumerated") != Some(false),
        tex: format!("\\[{}\\]", math.trim()),
    }
}

fn labeled_display(text: &str, gap: Range<usize>, found: &mut Vec<Definition>) {
    for caps in LABELED_DISPLAY.captures_iter(&text[gap.clone()]) {
        let (Some(all), Some(math), Some(label)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let (math, _) = take_label(math.as_str());
        found.push(Definition {
            range: gap.start + all.start()..gap.start + all.end(),
            label: Some(label.as_str().to_owned()),
            enumerated: true,
            tex: format!("\\[{}\\]", math.trim()),
        });
    }
}

fn ams_environment(text: &str, gap: Range<usize>, found: &mut Vec<Definition>) {
    let chunk = &text[gap.clone()];
    let mut pos = 0;

    while let Some(caps) = AMS_BEGIN.captures_at(chunk, pos) {
        let (Some(begin), Some(env), Some(star)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };
        let end_tag = format!("\\end{{{}{}}}", env.as_str(), star.as_str());
        let Some(offset) = chunk[begin.end()..].find(&end_tag) else {
            pos = begin.end();
            continue;
        };

        let inner = &chunk[begin.end()..begin.end() + offset];
        let mut start = begin.start();
        let mut end = begin.end() + offset + end_tag.len();

        // `$$` around the environment belongs to it.
        let before = chunk[pos..start].trim_end();
        let after = &chunk[end..];
        let after_trimmed = after.trim_start();
        if before.ends_with("$$") && after_trimmed.starts_with("$$") {
            start = pos + before.len() - 2;
            end += after.len() - after_trimmed.len() + 2;
        }

        let (inner, label) = take_label(inner);
        let tex = if env.as_str() == "split" {
            format!("\\[\\begin{{split}}{inner}\\end{{split}}\\]")
        } else {
            let env = env.as_str();
            format!("\\begin{{{env}*}}{inner}\\end{{{env}*}}")
        };

        found.push(Definition {
            range: gap.start + start..gap.start + end,
            label,
            enumerated: star.as_str().is_empty(),
            tex,
        });
        pos = end;
    }
}

fn display(text: &str, gap: Range<usize>, found: &mut Vec<Definition>) {
    for caps in DISPLAY.captures_iter(&text[gap.clone()]) {
        let (Some(all), Some(math)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let (math, label) = take_label(math.as_str());
        found.push(Definition {
            range: gap.start + all.start()..gap.start + all.end(),
            label,
            enumerated: true,
            tex: format!("\\[{}\\]", math.trim()),
        });
    }
}

/// Remove `\label{...}` commands, returning the first label.
fn take_label(math: &str) -> (String, Option<String>) {
    let label = LABEL
        .captures(math)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|label| !label.is_empty());
    (LABEL.replace_all(math, "").into_owned(), label)
}
