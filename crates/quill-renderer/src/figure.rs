//! Figure targets and `figure`/`image` directives.
//!
//! A target line names an image once so figures can refer to it:
//!
//! ```markdown
//! (fig-loss)=![Training loss](https://github.com/acme/notes/blob/main/loss.png)
//!
//! :::{figure} #fig-loss
//! :width: 80%
//! Loss over 10 epochs.
//! :::
//! ```
//!
//! Target lines are removed from the text. Figures referring to an unknown
//! target render a visible placeholder.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::directive::split_options;
use crate::fence::{DirectiveBlock, LineIndex, Segment, walk};
use crate::regions::is_verbatim;
use crate::util::escape_html;

static TARGET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\(([^()\s]+)\)=!\[([^\]]*)\]\(([^()\s]+)\)[ \t]*$").unwrap()
});

/// `(name)=` on its own line.
static LABEL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\(([^()\s]+)\)=[ \t]*$").unwrap());

static GITHUB_BLOB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)/blob/([^?#]+)(?:\?raw=true)?$").unwrap()
});

/// File extensions rendered as `<video>`.
pub(crate) const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "m4v"];

/// Image named by a target line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureTarget {
    pub alt: String,
    pub src: String,
}

/// Targets defined in one document.
#[derive(Clone, Debug, Default)]
pub struct FigureTargets {
    targets: HashMap<String, FigureTarget>,
}

impl FigureTargets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a target. Returns `false` if the name was already defined;
    /// the first definition is kept.
    pub fn insert(&mut self, name: impl Into<String>, target: FigureTarget) -> bool {
        let name = name.into();
        if self.targets.contains_key(&name) {
            return false;
        }
        self.targets.insert(name, target);
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FigureTarget> {
        self.targets.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Rewrite GitHub `blob` page URLs to raw file URLs.
pub(crate) fn normalize_source(src: &str) -> String {
    match GITHUB_BLOB.captures(src) {
        Some(caps) => format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            &caps[1], &caps[2], &caps[3]
        ),
        None => src.to_owned(),
    }
}

/// Check if a source points to a video file.
pub(crate) fn is_video(src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

fn is_figure_directive(name: &str) -> bool {
    matches!(name, "figure" | "image")
}

/// Collect target lines and render `figure`/`image` directives.
pub(crate) fn resolve(
    text: &str,
    targets: &mut FigureTargets,
    warnings: &mut Vec<String>,
) -> String {
    let index = LineIndex::new(text);
    let lines = &index.lines;
    let segments = walk(lines, |name| is_figure_directive(name) || is_verbatim(name));

    // Targets may be defined after the figures using them.
    for segment in &segments {
        if let Segment::Line(idx) = segment
            && let Some(caps) = TARGET_LINE.captures(lines[*idx])
        {
            let target = FigureTarget {
                alt: caps[2].to_owned(),
                src: normalize_source(&caps[3]),
            };
            if !targets.insert(&caps[1], target) {
                tracing::warn!(name = &caps[1], "Duplicate figure target, keeping the first");
                warnings.push(format!(
                    "Duplicate figure target '{}', keeping the first definition",
                    &caps[1]
                ));
            }
        }
    }

    let mut pieces: Vec<String> = Vec::with_capacity(lines.len());
    for segment in segments {
        match segment {
            Segment::Line(idx) => {
                let line = lines[idx];
                if TARGET_LINE.is_match(line) {
                    continue;
                }
                match LABEL_LINE.captures(line) {
                    Some(caps) => {
                        pieces.push(format!(r#"<span id="{}"></span>"#, escape_html(&caps[1])));
                    }
                    None => pieces.push(line.to_owned()),
                }
            }
            Segment::Code { start, end } => pieces.push(lines[start..=end].join("\n")),
            Segment::Unclosed { line, .. } => pieces.push(lines[line].to_owned()),
            Segment::Directive(block) if is_figure_directive(block.name) => {
                let html = render(lines, &block, targets, warnings);
                pieces.push(format!("\n{html}\n"));
            }
            Segment::Directive(block) => pieces.push(lines[block.start..=block.end].join("\n")),
        }
    }

    pieces.join("\n")
}

fn render(
    lines: &[&str],
    block: &DirectiveBlock<'_>,
    targets: &FigureTargets,
    warnings: &mut Vec<String>,
) -> String {
    let content = lines[block.start + 1..block.end].join("\n");
    let (options, caption) = split_options(&content);
    let caption = caption.trim_matches('\n');
    let argument = block.argument.trim();

    let (src, default_alt) = match argument.strip_prefix('#') {
        Some(name) => match targets.get(name) {
            Some(target) => (target.src.clone(), target.alt.as_str()),
            None => {
                tracing::warn!(name, "Figure target not found");
                warnings.push(format!("Figure target not found: {name}"));
                return format!(
                    r#"<div class="figure-not-found" data-target="{0}">Figure target not found: {0}</div>"#,
                    escape_html(name)
                );
            }
        },
        None if argument.is_empty() => {
            warnings.push(format!("{} directive without a source", block.name));
            return format!(
                r#"<div class="figure-not-found" data-target="">{} without a source</div>"#,
                block.name
            );
        }
        None => (normalize_source(argument), ""),
    };

    let alt = options.get("alt").unwrap_or(default_alt);
    let id = options
        .value("label")
        .or_else(|| options.value("name"))
        .map(|id| format!(r#" id="{}""#, escape_html(id)))
        .unwrap_or_default();
    let mut classes = String::new();
    if let Some(align) = options.value("align") {
        let _ = write!(classes, " align-{}", escape_html(align));
    }
    if let Some(class) = options.value("class") {
        let _ = write!(classes, " {}", escape_html(class));
    }
    let size = options.value("width").map(size_attr).unwrap_or_default();

    let media = if is_video(&src) {
        format!(
            r#"<video controls preload="metadata" src="{}"{size}>{}</video>"#,
            escape_html(&src),
            escape_html(alt)
        )
    } else {
        format!(
            r#"<img src="{}" alt="{}"{size} loading="lazy">"#,
            escape_html(&src),
            escape_html(alt)
        )
    };

    if block.name == "image" {
        return format!("<div class=\"image{classes}\"{id}>\n{media}\n</div>");
    }

    let mut html = format!("<figure class=\"figure{classes}\"{id}>\n{media}");
    if !caption.trim().is_empty() {
        let _ = write!(html, "\n<figcaption>\n\n{caption}\n\n</figcaption>");
    }
    html.push_str("\n</figure>");
    html
}

/// Plain pixel widths become a `width` attribute, anything else a style.
fn size_attr(width: &str) -> String {
    if width.chars().all(|c| c.is_ascii_digit()) {
        format!(r#" width="{width}""#)
    } else {
        format!(r#" style="width: {}""#, escape_html(width))
    }
}
