//! Directive engine.
//!
//! Scans text line by line for fenced directives, renders nested
//! directives in each body first and then hands the finished node to the
//! handler registered for its name.

use std::collections::HashMap;
use std::fmt::Write;

use crate::fence::{DirectiveBlock, Segment, walk};
use crate::util::escape_html;

use super::handlers::inline_title;
use super::node::split_options;
use super::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};

/// Default limit on directive nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Recursive renderer for block directives.
///
/// Handlers are looked up by name. Unknown names render as a generic
/// `<div class="directive ...">` so that their content is never lost.
///
/// # Example
///
/// ```
/// use quill_renderer::directive::{DirectiveContext, DirectiveEngine};
///
/// let engine = DirectiveEngine::new().with_builtin_directives();
/// let mut ctx = DirectiveContext::new();
///
/// let output = engine.process(":::{note}\nHello\n:::", &mut ctx);
/// assert!(output.contains(r#"<div class="admonition note">"#));
/// assert!(output.contains("Hello"));
/// ```
pub struct DirectiveEngine {
    handlers: HashMap<String, Box<dyn BlockDirective>>,
    max_depth: usize,
}

impl Default for DirectiveEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveEngine {
    /// Create an engine without handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth. Deeper blocks stay literal.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register a handler, replacing any handler with the same name.
    #[must_use]
    pub fn with_directive<D: BlockDirective + 'static>(mut self, handler: D) -> Self {
        self.handlers
            .insert(handler.name().to_owned(), Box::new(handler));
        self
    }

    /// Check if a handler is registered for `name`.
    #[must_use]
    pub fn handles(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Render every directive in `input`.
    ///
    /// Fenced code blocks are copied unchanged. An opening fence without a
    /// matching closing fence is kept as literal text.
    #[must_use]
    pub fn process(&self, input: &str, ctx: &mut DirectiveContext) -> String {
        self.process_at_depth(input, 0, ctx)
    }

    fn process_at_depth(&self, input: &str, depth: usize, ctx: &mut DirectiveContext) -> String {
        let lines: Vec<&str> = input.split('\n').collect();
        let mut pieces: Vec<String> = Vec::with_capacity(lines.len());

        for segment in walk(&lines, |_| true) {
            match segment {
                Segment::Line(idx) => pieces.push(lines[idx].to_owned()),
                Segment::Code { start, end } => pieces.push(lines[start..=end].join("\n")),
                Segment::Unclosed { line, name } => {
                    tracing::warn!(directive = name, line = line + 1, "Unclosed directive");
                    ctx.warn(format!(
                        "Unclosed directive '{name}' at line {}, kept as text",
                        line + 1
                    ));
                    pieces.push(lines[line].to_owned());
                }
                Segment::Directive(block) => {
                    pieces.push(self.render_block(&lines, &block, depth, ctx));
                }
            }
        }

        pieces.join("\n")
    }

    fn render_block(
        &self,
        lines: &[&str],
        block: &DirectiveBlock<'_>,
        depth: usize,
        ctx: &mut DirectiveContext,
    ) -> String {
        let source = || lines[block.start..=block.end].join("\n");

        if depth >= self.max_depth {
            tracing::warn!(
                directive = block.name,
                max_depth = self.max_depth,
                "Directive nesting too deep"
            );
            ctx.warn(format!(
                "Directive '{}' nested deeper than {} levels, kept as text",
                block.name, self.max_depth
            ));
            return source();
        }

        // An indented opener (inside a list item or definition) indents its
        // whole block; the body is dedented and the output re-indented.
        let opener = lines[block.start];
        let indent = &opener[..opener.len() - opener.trim_start().len()];
        let content = lines[block.start + 1..block.end]
            .iter()
            .map(|line| line.strip_prefix(indent).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");
        let (options, body) = split_options(&content);
        let handler = self.handlers.get(block.name);

        let body = match handler {
            Some(handler) if handler.verbatim() => body.to_owned(),
            Some(handler) => {
                handler.enter(ctx);
                self.process_at_depth(body, depth + 1, ctx)
            }
            None => self.process_at_depth(body, depth + 1, ctx),
        };

        let node = DirectiveNode {
            name: block.name.to_owned(),
            argument: block.argument.to_owned(),
            options,
            body: body.trim_matches('\n').to_owned(),
        };

        let output = match handler {
            Some(handler) => handler.render(&node, ctx),
            None => render_unknown(&node, ctx),
        };

        let rendered = match output {
            DirectiveOutput::Html(text) | DirectiveOutput::Markdown(text) => text,
            DirectiveOutput::Skip => return source(),
        };
        format!("\n{}\n", reindent(rendered.trim_matches('\n'), indent))
    }
}

/// Prefix every non-blank line with `indent`.
fn reindent(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_owned();
    }
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generic wrapper for directives without a handler.
fn render_unknown(node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
    tracing::debug!(directive = %node.name, "No handler for directive, using generic block");
    ctx.warn(format!(
        "Unknown directive '{}' rendered as a generic block",
        node.name
    ));

    let kind = crate::util::slugify(&node.name);
    let mut html = format!(
        r#"<div class="directive directive-{kind}{}" data-directive="{}"{}>"#,
        node.extra_classes(),
        escape_html(&node.name),
        node.id_attr()
    );
    if !node.argument.is_empty() {
        let _ = write!(
            html,
            "\n<p class=\"directive-title\">{}</p>",
            inline_title(&node.argument)
        );
    }
    let _ = write!(html, "\n\n{}\n\n</div>", node.body);

    DirectiveOutput::Html(html)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Wrap;

    impl BlockDirective for Wrap {
        fn name(&self) -> &'static str {
            "wrap"
        }

        fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
            DirectiveOutput::html(format!(
                "<div class=\"wrap\" data-arg=\"{}\">\n\n{}\n\n</div>",
                node.argument, node.body
            ))
        }
    }

    struct Raw;

    impl BlockDirective for Raw {
        fn name(&self) -> &'static str {
            "raw"
        }

        fn verbatim(&self) -> bool {
            true
        }

        fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
            DirectiveOutput::markdown(format!("```\n{}\n```", node.body))
        }
    }

    struct Decline;

    impl BlockDirective for Decline {
        fn name(&self) -> &'static str {
            "decline"
        }

        fn render(&self, _node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
            DirectiveOutput::Skip
        }
    }

    fn engine() -> DirectiveEngine {
        DirectiveEngine::new()
            .with_directive(Wrap)
            .with_directive(Raw)
            .with_directive(Decline)
    }

    fn process(input: &str) -> (String, Vec<String>) {
        let mut ctx = DirectiveContext::new();
        let output = engine().process(input, &mut ctx);
        (output, ctx.take_warnings())
    }

    #[test]
    fn test_simple_block() {
        let (output, warnings) = process("before\n:::{wrap} A\nbody\n:::\nafter");
        assert_eq!(
            output,
            "before\n\n<div class=\"wrap\" data-arg=\"A\">\n\nbody\n\n</div>\n\nafter"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_nested_same_fence() {
        let (output, _) = process(":::{wrap} outer\n:::{wrap} inner\nx\n:::\ntail\n:::");
        let outer = output.find("data-arg=\"outer\"").unwrap();
        let inner = output.find("data-arg=\"inner\"").unwrap();
        let tail = output.find("tail").unwrap();
        let last_close = output.rfind("</div>").unwrap();
        assert!(outer < inner && inner < tail && tail < last_close);
    }

    #[test]
    fn test_three_levels() {
        let input = "::::{wrap} 1\n:::{wrap} 2\n```{wrap} 3\ndeep\n```\n:::\n::::";
        let (output, warnings) = process(input);
        assert_eq!(output.matches("<div class=\"wrap\"").count(), 3);
        assert_eq!(output.matches("</div>").count(), 3);
        assert!(output.contains("deep"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_backtick_and_colon_equivalent() {
        let (colon, _) = process(":::{wrap} T\nbody\n:::");
        let (backtick, _) = process("```{wrap} T\nbody\n```");
        assert_eq!(colon, backtick);
    }

    #[test]
    fn test_verbatim_body_not_processed() {
        let (output, _) = process("```{raw}\n:::{wrap}\nx\n:::\n```");
        assert_eq!(output, "\n```\n:::{wrap}\nx\n:::\n```\n");
    }

    #[test]
    fn test_skip_keeps_source() {
        let (output, _) = process(":::{decline}\nx\n:::");
        assert_eq!(output, ":::{decline}\nx\n:::");
    }

    #[test]
    fn test_indented_block_keeps_indent() {
        let (output, warnings) = process("- item\n\n  :::{wrap} B\n  x\n  :::");
        assert_eq!(
            output,
            "- item\n\n\n  <div class=\"wrap\" data-arg=\"B\">\n\n  x\n\n  </div>\n"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unclosed_kept_literal() {
        let (output, warnings) = process(":::{wrap}\nHello");
        assert_eq!(output, ":::{wrap}\nHello");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_code_fence_untouched() {
        let input = "```markdown\n:::{wrap}\nx\n:::\n```";
        let (output, _) = process(input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_unknown_directive_generic() {
        let (output, warnings) = process(":::{sidebar} Extra\nContent\n:::");
        assert!(output.contains(r#"<div class="directive directive-sidebar" data-directive="sidebar">"#));
        assert!(output.contains("<p class=\"directive-title\">Extra</p>"));
        assert!(output.contains("Content"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_max_depth() {
        let mut ctx = DirectiveContext::new();
        let engine = engine().with_max_depth(1);
        let output = engine.process("::::{wrap} a\n:::{wrap} b\nx\n:::\n::::", &mut ctx);
        assert!(output.contains(":::{wrap} b"));
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_options_passed() {
        struct Opt;

        impl BlockDirective for Opt {
            fn name(&self) -> &'static str {
                "opt"
            }

            fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
                DirectiveOutput::html(format!(
                    "{}|{}",
                    node.options.get("class").unwrap_or_default(),
                    node.body
                ))
            }
        }

        let mut ctx = DirectiveContext::new();
        let engine = DirectiveEngine::new().with_directive(Opt);
        let output = engine.process(":::{opt}\n:class: x\n\nbody\n:::", &mut ctx);
        assert_eq!(output, "\nx|body\n");
    }
}
