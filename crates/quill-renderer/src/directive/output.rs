//! Directive output types.
//!
//! Defines the output variants that directive handlers can return.

/// Output from directive rendering.
///
/// - [`Html`](Self::Html): raw HTML, spliced in with blank lines around it
///   so the markdown pass treats it as an HTML block
/// - [`Markdown`](Self::Markdown): markdown left for the final pass (code blocks)
/// - [`Skip`](Self::Skip): keep the directive source unchanged
///
/// # Example
///
/// ```
/// use quill_renderer::directive::DirectiveOutput;
///
/// let output = DirectiveOutput::html(r#"<div class="card">"#);
/// assert!(matches!(output, DirectiveOutput::Html(_)));
///
/// let output = DirectiveOutput::markdown("```python\nprint(1)\n```");
/// assert!(matches!(output, DirectiveOutput::Markdown(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutput {
    /// HTML that passes through pulldown-cmark unchanged.
    Html(String),
    /// Markdown rendered by the final pass.
    ///
    /// Used by `code` so that fenced code keeps its language class.
    Markdown(String),
    /// Don't handle this directive (pass through unchanged).
    Skip,
}

impl DirectiveOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    /// Create a markdown output.
    #[must_use]
    pub fn markdown(s: impl Into<String>) -> Self {
        Self::Markdown(s.into())
    }
}
