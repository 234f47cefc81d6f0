//! Embedded media: iframes, videos and side-by-side video comparisons.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};
use crate::util::escape_html;

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_\-]{6,})",
    )
    .unwrap()
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.|player\.)?vimeo\.com/(?:video/)?(\d+)").unwrap()
});

/// Hosted video converted to an embeddable player URL.
fn embed_url(src: &str) -> Option<String> {
    if let Some(caps) = YOUTUBE.captures(src) {
        return Some(format!("https://www.youtube.com/embed/{}", &caps[1]));
    }
    VIMEO
        .captures(src)
        .map(|caps| format!("https://player.vimeo.com/video/{}", &caps[1]))
}

/// `width="..."` style attribute for an optional value.
fn attr(name: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!(r#" {name}="{}""#, escape_html(v)))
        .unwrap_or_default()
}

fn iframe(src: &str, node: &DirectiveNode, default_title: &str) -> String {
    let title = node.options.value("title").unwrap_or(default_title);
    format!(
        r#"<iframe src="{}"{}{} title="{}" loading="lazy" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
        escape_html(src),
        attr("width", node.options.value("width")),
        attr("height", node.options.value("height")),
        escape_html(title)
    )
}

fn caption(body: &str) -> String {
    if body.trim().is_empty() {
        String::new()
    } else {
        format!("\n<div class=\"media-caption\">\n\n{body}\n\n</div>")
    }
}

/// `<iframe>` wrapped in a responsive container.
pub struct Iframe;

impl BlockDirective for Iframe {
    fn name(&self) -> &'static str {
        "iframe"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let src = node.argument.trim();
        if src.is_empty() {
            ctx.warn("iframe directive without a source URL");
            return DirectiveOutput::Skip;
        }

        DirectiveOutput::html(format!(
            "<div class=\"iframe-container{}\"{}>\n{}{}\n</div>",
            node.extra_classes(),
            node.id_attr(),
            iframe(src, node, "Embedded content"),
            caption(&node.body)
        ))
    }
}

/// Video file or hosted video (YouTube, Vimeo).
pub struct Video;

impl BlockDirective for Video {
    fn name(&self) -> &'static str {
        "video"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let src = node.argument.trim();
        if src.is_empty() {
            ctx.warn("video directive without a source");
            return DirectiveOutput::Skip;
        }

        let player = match embed_url(src) {
            Some(url) => iframe(&url, node, "Video"),
            None => video_element(src, node),
        };

        DirectiveOutput::html(format!(
            "<div class=\"video-container{}\"{}>\n{player}{}\n</div>",
            node.extra_classes(),
            node.id_attr(),
            caption(&node.body)
        ))
    }
}

fn video_element(src: &str, node: &DirectiveNode) -> String {
    let mut html = String::from("<video controls");
    for flag in ["autoplay", "loop", "muted"] {
        if node.options.is_set(flag) {
            let _ = write!(html, " {flag}");
        }
    }
    if node.options.is_set("autoplay") {
        html.push_str(" playsinline");
    }
    html.push_str(&attr("poster", node.options.value("poster")));
    html.push_str(&attr("width", node.options.value("width")));
    let _ = write!(
        html,
        r#" preload="metadata"><source src="{}"{}>Your browser does not support the video tag.</video>"#,
        escape_html(src),
        attr("type", video_mime(src))
    );
    html
}

fn video_mime(src: &str) -> Option<&'static str> {
    let ext = src.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "ogg" | "ogv" => Some("video/ogg"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// Two videos side by side with labels.
///
/// Sources come from `:left:`/`:right:` or the first two non-empty body
/// lines; the remaining body is the caption.
pub struct VideoCompare;

impl BlockDirective for VideoCompare {
    fn name(&self) -> &'static str {
        "video-compare"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let mut body_lines = node.body.lines().filter(|l| !l.trim().is_empty());
        let mut sources = Vec::with_capacity(2);
        for side in ["left", "right"] {
            match node.options.value(side) {
                Some(src) => sources.push(src.trim().to_owned()),
                None => {
                    if let Some(line) = body_lines.next() {
                        sources.push(line.trim().to_owned());
                    }
                }
            }
        }
        if sources.len() < 2 {
            ctx.warn("video-compare needs two video sources");
            return DirectiveOutput::Skip;
        }
        let rest: Vec<&str> = body_lines.collect();

        let labels = [
            node.options.value("left-label").unwrap_or("Before"),
            node.options.value("right-label").unwrap_or("After"),
        ];

        let mut html = format!(
            "<div class=\"video-compare{}\"{}>",
            node.extra_classes(),
            node.id_attr()
        );
        for (src, label) in sources.iter().zip(labels) {
            let _ = write!(
                html,
                "\n<div class=\"video-compare-item\">\n<div class=\"video-compare-label\">{}</div>\n{}\n</div>",
                escape_html(label),
                video_element(src, node)
            );
        }
        html.push_str(&caption(&rest.join("\n")));
        html.push_str("\n</div>");

        DirectiveOutput::html(html)
    }
}
