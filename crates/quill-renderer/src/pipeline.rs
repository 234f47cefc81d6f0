//! Article rendering pipeline.
//!
//! Stages run strictly in order, each on the output of the previous one:
//!
//! 1. frontmatter split
//! 2. abbreviations
//! 3. math (equations, references, inline math)
//! 4. figure targets and figures
//! 5. block directives
//! 6. inline roles
//! 7. markdown to HTML
//! 8. media path rewriting
//!
//! Stages 2 to 6 work on markdown and leave HTML blocks behind that the
//! markdown pass copies verbatim.

use crate::abbreviation::AbbreviationExpander;
use crate::context::RenderContext;
use crate::directive::{DEFAULT_MAX_DEPTH, DirectiveEngine};
use crate::markdown::TocEntry;
use crate::paths::{PathMode, PathRewriter};
use crate::{figure, frontmatter, markdown, math, role};

/// Which article is being rendered. Only used to build media URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArticleIdentity {
    pub category: String,
    pub slug: String,
}

impl ArticleIdentity {
    #[must_use]
    pub fn new(category: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            slug: slug.into(),
        }
    }
}

/// Pipeline settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub path_mode: PathMode,
    /// Directives nested deeper than this stay literal.
    pub max_directive_depth: usize,
    /// Wrap tables in `<div class="table-wrapper">`.
    pub wrap_tables: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            path_mode: PathMode::Local,
            max_directive_depth: DEFAULT_MAX_DEPTH,
            wrap_tables: true,
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_path_mode(mut self, path_mode: PathMode) -> Self {
        self.path_mode = path_mode;
        self
    }

    #[must_use]
    pub fn with_max_directive_depth(mut self, depth: usize) -> Self {
        self.max_directive_depth = depth;
        self
    }

    #[must_use]
    pub fn with_wrap_tables(mut self, wrap_tables: bool) -> Self {
        self.wrap_tables = wrap_tables;
        self
    }
}

/// A rendered article.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedBlogPost {
    pub slug: String,
    pub category: String,
    /// `blog_title`, else the first H1, else the slug.
    pub title: String,
    pub date: Option<String>,
    pub author: Option<String>,
    /// Thumbnail path, resolved like media `src` attributes.
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    /// Frontmatter `blogpost` flag.
    pub published: bool,
    /// Math macros declared in the frontmatter, passed through to the page.
    pub math_macros: Vec<(String, String)>,
    /// Rendered HTML.
    pub content: String,
    /// Body text without the frontmatter block.
    pub raw_body: String,
    pub toc: Vec<TocEntry>,
    /// Problems recovered from while rendering.
    pub warnings: Vec<String>,
}

/// Reusable article renderer.
///
/// Holds the directive handlers; each [`render`](Self::render) call gets
/// its own [`RenderContext`], so one renderer can serve concurrent renders.
///
/// # Example
///
/// ```
/// use quill_renderer::{ArticleIdentity, ArticleRenderer, RenderOptions};
///
/// let renderer = ArticleRenderer::new(RenderOptions::default());
/// let post = renderer.render(
///     "---\nblog_title: Hello\nblogpost: true\n---\n:::{note}\nHi\n:::\n",
///     &ArticleIdentity::new("ai", "hello"),
/// );
///
/// assert_eq!(post.title, "Hello");
/// assert!(post.published);
/// assert!(post.content.contains(r#"<div class="admonition note">"#));
/// ```
pub struct ArticleRenderer {
    engine: DirectiveEngine,
    options: RenderOptions,
}

impl ArticleRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        let engine = DirectiveEngine::new()
            .with_builtin_directives()
            .with_max_depth(options.max_directive_depth);
        Self { engine, options }
    }

    /// Render one article. Never fails; problems end up in `warnings`.
    #[must_use]
    pub fn render(&self, raw: &str, identity: &ArticleIdentity) -> RenderedBlogPost {
        let raw = raw.replace("\r\n", "\n");
        let mut ctx = RenderContext::new();

        let (meta, body) = frontmatter::split(&raw, &mut ctx.warnings);

        let text = match AbbreviationExpander::new(&meta.abbreviations) {
            Some(expander) => expander.expand(body),
            None => body.to_owned(),
        };
        let text = math::resolve(&text, &mut ctx.equations, &mut ctx.warnings);
        let text = figure::resolve(&text, &mut ctx.figures, &mut ctx.warnings);
        let text = self.engine.process(&text, &mut ctx.directives);
        let text = role::resolve(&text);
        let rendered = markdown::render(&text, self.options.wrap_tables);

        let rewriter = PathRewriter::new(&self.options.path_mode, &identity.category, &identity.slug);
        let content = rewriter.rewrite_html(&rendered.html).into_owned();

        let warnings = ctx.take_warnings();
        tracing::debug!(
            category = %identity.category,
            slug = %identity.slug,
            equations = ctx.equations.len(),
            warnings = warnings.len(),
            "Rendered article"
        );

        let title = meta
            .title
            .or(rendered.title)
            .unwrap_or_else(|| identity.slug.clone());

        RenderedBlogPost {
            slug: identity.slug.clone(),
            category: identity.category.clone(),
            title,
            date: meta.date,
            author: meta.author,
            thumbnail: meta.thumbnail.map(|path| rewriter.resolve(&path)),
            tags: meta.tags,
            description: meta.description,
            language: meta.language,
            published: meta.blogpost,
            math_macros: meta.math_macros,
            content,
            raw_body: body.to_owned(),
            toc: rendered.toc,
            warnings,
        }
    }
}

/// Render one article with a one-off [`ArticleRenderer`].
#[must_use]
pub fn render_article(
    raw: &str,
    identity: &ArticleIdentity,
    options: &RenderOptions,
) -> RenderedBlogPost {
    ArticleRenderer::new(options.clone()).render(raw, identity)
}
