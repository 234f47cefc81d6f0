//! Block directive trait.
//!
//! Block directives are fenced with colons or backticks:
//!
//! ````markdown
//! :::{note} Optional title
//! :class: wide
//! Body text.
//! :::
//!
//! ```{code-block} python
//! print("hi")
//! ```
//! ````

use super::{DirectiveContext, DirectiveNode, DirectiveOutput};

/// Handler for one directive name.
///
/// The engine parses the block, renders nested directives in the body
/// (unless [`verbatim`](Self::verbatim) is set) and then calls
/// [`render`](Self::render) with the finished node.
///
/// # Example
///
/// ```
/// use quill_renderer::directive::{
///     BlockDirective, DirectiveContext, DirectiveEngine, DirectiveNode, DirectiveOutput,
/// };
///
/// struct Aside;
///
/// impl BlockDirective for Aside {
///     fn name(&self) -> &str { "aside" }
///
///     fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
///         DirectiveOutput::html(format!("<aside>\n\n{}\n\n</aside>", node.body))
///     }
/// }
///
/// let engine = DirectiveEngine::new().with_directive(Aside);
/// let mut ctx = DirectiveContext::new();
/// let output = engine.process(":::{aside}\nSide note\n:::", &mut ctx);
/// assert!(output.contains("<aside>\n\nSide note\n\n</aside>"));
/// ```
pub trait BlockDirective: Send + Sync {
    /// Directive name (e.g., "note", "tab-set", "prf:theorem").
    fn name(&self) -> &str;

    /// Keep the body as written instead of rendering nested directives.
    fn verbatim(&self) -> bool {
        false
    }

    /// Called before the body is processed.
    ///
    /// Containers that collect their children (like `tab-set`) open their
    /// frame here.
    fn enter(&self, _ctx: &mut DirectiveContext) {}

    /// Render the directive.
    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput;
}
