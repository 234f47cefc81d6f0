//! Image and video path rewriting.
//!
//! Articles refer to their media relative to the article directory. The
//! rendered page is served from elsewhere, so `src` and `poster` attributes
//! are rewritten either to same-origin paths (local) or to the external
//! raw-content host (published).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `src="..."` or `poster="..."` attribute, preceded by whitespace.
static MEDIA_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s)(src|poster)="([^"]*)""#).unwrap());

/// Spellings of the article's own image directory.
const IMAGE_PREFIXES: &[&str] = &["./images/", "images/", "./image/", "image/"];

/// Spellings of the category's shared image directory.
const SHARED_IMAGE_PREFIXES: &[&str] = &["../images/", "../image/"];

const VIDEO_PREFIXES: &[&str] = &["./videos/", "videos/"];

/// Where media URLs should point.
///
/// # Example
///
/// ```
/// use quill_renderer::{PathMode, PathRewriter};
///
/// let local = PathRewriter::new(&PathMode::Local, "ai", "post1");
/// assert_eq!(local.resolve("./images/a.png"), "/blogs/ai/post1/images/a.png");
///
/// let published = PathRewriter::new(
///     &PathMode::Published { base_url: "https://raw.example.com/blog/main".to_owned() },
///     "ai",
///     "post1",
/// );
/// assert_eq!(
///     published.resolve("images/a.png"),
///     "https://raw.example.com/blog/main/blogs/ai/post1/images/a.png"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PathMode {
    /// Media served by the local dev server under `/blogs/`.
    #[default]
    Local,
    /// Media served from an external raw-content host.
    Published {
        /// Base URL the `blogs/` tree is published under.
        base_url: String,
    },
}

/// Rewrites media paths of one article.
#[derive(Clone, Debug)]
pub struct PathRewriter {
    /// Host root, empty in local mode.
    root: String,
    image_base: String,
    shared_image_base: String,
    video_base: String,
}

impl PathRewriter {
    #[must_use]
    pub fn new(mode: &PathMode, category: &str, slug: &str) -> Self {
        let root = match mode {
            PathMode::Local => String::new(),
            PathMode::Published { base_url } => base_url.trim_end_matches('/').to_owned(),
        };
        let image_base = format!("{root}/blogs/{category}/{slug}/images/");
        let video_base = video_base_from(&image_base);

        Self {
            shared_image_base: format!("{root}/blogs/{category}/images/"),
            image_base,
            video_base,
            root,
        }
    }

    /// Resolve one media path. Paths that are not article-relative are
    /// returned unchanged.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        let rules = [
            (SHARED_IMAGE_PREFIXES, &self.shared_image_base),
            (IMAGE_PREFIXES, &self.image_base),
            (VIDEO_PREFIXES, &self.video_base),
        ];
        for (prefixes, base) in rules {
            for prefix in prefixes {
                if let Some(rest) = path.strip_prefix(*prefix) {
                    return format!("{base}{rest}");
                }
            }
        }

        // Already resolved for the local server: retarget to the host.
        if !self.root.is_empty() && path.starts_with("/blogs/") {
            return format!("{}{path}", self.root);
        }

        path.to_owned()
    }

    /// Rewrite every `src` and `poster` attribute in `html`.
    #[must_use]
    pub fn rewrite_html<'a>(&self, html: &'a str) -> Cow<'a, str> {
        MEDIA_ATTR.replace_all(html, |caps: &Captures<'_>| {
            format!(r#"{}{}="{}""#, &caps[1], &caps[2], self.resolve(&caps[3]))
        })
    }
}

/// Replace the last path segment of the image base with `videos`.
fn video_base_from(image_base: &str) -> String {
    let trimmed = image_base.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, _)) => format!("{parent}/videos/"),
        None => "videos/".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn published() -> PathRewriter {
        PathRewriter::new(
            &PathMode::Published {
                base_url: "https://raw.example.com/blog/main/".to_owned(),
            },
            "ai",
            "post1",
        )
    }

    #[test]
    fn test_local_image_spellings() {
        let rewriter = PathRewriter::new(&PathMode::Local, "ai", "post1");
        for path in ["./images/a.png", "images/a.png", "./image/a.png", "image/a.png"] {
            assert_eq!(rewriter.resolve(path), "/blogs/ai/post1/images/a.png", "{path}");
        }
    }

    #[test]
    fn test_shared_images() {
        let rewriter = PathRewriter::new(&PathMode::Local, "ai", "post1");
        assert_eq!(rewriter.resolve("../images/logo.svg"), "/blogs/ai/images/logo.svg");
        assert_eq!(rewriter.resolve("../image/logo.svg"), "/blogs/ai/images/logo.svg");
    }

    #[test]
    fn test_videos() {
        let rewriter = PathRewriter::new(&PathMode::Local, "ai", "post1");
        assert_eq!(rewriter.resolve("videos/run.mp4"), "/blogs/ai/post1/videos/run.mp4");
        assert_eq!(
            published().resolve("./videos/run.mp4"),
            "https://raw.example.com/blog/main/blogs/ai/post1/videos/run.mp4"
        );
    }

    #[test]
    fn test_other_paths_unchanged() {
        let rewriter = PathRewriter::new(&PathMode::Local, "ai", "post1");
        assert_eq!(rewriter.resolve("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert_eq!(rewriter.resolve("/blogs/ai/post1/images/a.png"), "/blogs/ai/post1/images/a.png");
        assert_eq!(rewriter.resolve("assets/a.png"), "assets/a.png");
    }

    #[test]
    fn test_published_retargets_local_absolute() {
        assert_eq!(
            published().resolve("/blogs/ai/post1/images/a.png"),
            "https://raw.example.com/blog/main/blogs/ai/post1/images/a.png"
        );
    }

    #[test]
    fn test_rewrite_html() {
        let rewriter = PathRewriter::new(&PathMode::Local, "ai", "post1");
        let html = r#"<img src="./images/a.png" alt="a"><video controls poster="images/p.jpg" src="videos/v.mp4"></video><img data-src="images/x.png">"#;
        assert_eq!(
            rewriter.rewrite_html(html),
            r#"<img src="/blogs/ai/post1/images/a.png" alt="a"><video controls poster="/blogs/ai/post1/images/p.jpg" src="/blogs/ai/post1/videos/v.mp4"></video><img data-src="images/x.png">"#
        );
    }

    #[test]
    fn test_video_base_from() {
        assert_eq!(video_base_from("/blogs/ai/post1/images/"), "/blogs/ai/post1/videos/");
    }
}
