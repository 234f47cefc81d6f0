//! MyST-flavored markdown to HTML rendering for blog articles.
//!
//! An article is YAML frontmatter followed by markdown extended with
//! directives (`:::{note}`), roles (`` {kbd}`Ctrl+C` ``), numbered
//! equations and figure targets. [`render_article`] turns it into HTML
//! plus the metadata a blog index needs.
//!
//! # Pipeline
//!
//! Text transformations run in a fixed order:
//!
//! 1. Frontmatter split, duplicate keys dropped
//! 2. Abbreviation expansion
//! 3. Equations, equation references and inline math
//! 4. Figure targets and `figure` directives
//! 5. Block directives ([`directive::DirectiveEngine`])
//! 6. Inline roles
//! 7. pulldown-cmark with GFM extensions
//! 8. Media path rewriting ([`PathRewriter`])
//!
//! Rendering never fails. Malformed input degrades to visible markers or
//! literal text, and every recovered problem is reported in
//! [`RenderedBlogPost::warnings`].
//!
//! # Example
//!
//! ```
//! use quill_renderer::{ArticleIdentity, RenderOptions, render_article};
//!
//! let raw = "---\nblog_title: Loss\n---\n```{math}\n:label: eq-loss\nL = (y - \\hat y)^2\n```\n\nMinimize {eq}`eq-loss`.\n";
//! let post = render_article(raw, &ArticleIdentity::new("ai", "loss"), &RenderOptions::default());
//!
//! assert_eq!(post.title, "Loss");
//! assert!(post.content.contains(r#"<div class="equation-block" id="eq-loss">"#));
//! assert!(post.content.contains(r##"<a class="equation-ref" href="#eq-loss">(1)</a>"##));
//! ```

mod abbreviation;
mod context;
pub mod directive;
mod fence;
mod figure;
mod frontmatter;
mod markdown;
mod math;
mod paths;
mod pipeline;
mod regions;
mod role;
mod util;

pub use context::RenderContext;
pub use figure::{FigureTarget, FigureTargets};
pub use markdown::TocEntry;
pub use math::{DuplicateLabel, Equation, EquationRegistry};
pub use paths::{PathMode, PathRewriter};
pub use pipeline::{
    ArticleIdentity, ArticleRenderer, RenderOptions, RenderedBlogPost, render_article,
};
pub use util::{escape_html, slugify};
