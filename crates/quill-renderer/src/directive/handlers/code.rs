//! Code blocks and diagrams.
//!
//! Both keep their body verbatim. Code is handed back to the markdown pass
//! as a fenced block so it keeps its `language-*` class; diagram sources
//! are base64-encoded so the HTML parser never sees them.

use std::fmt::Write;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};
use crate::util::{dedent, escape_html};

/// `code`, `code-block` and `sourcecode`.
pub struct Code {
    name: &'static str,
}

impl Code {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl BlockDirective for Code {
    fn name(&self) -> &str {
        self.name
    }

    fn verbatim(&self) -> bool {
        true
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        let language = node.argument.split_whitespace().next().unwrap_or("");
        let body = dedent(&node.body);
        let fence = "`".repeat(longest_backtick_run(&body).max(2) + 1);

        let mut markdown = String::new();
        if let Some(caption) = node.options.value("caption") {
            let _ = write!(
                markdown,
                "<div class=\"code-caption\"{}>{}</div>\n\n",
                node.id_attr(),
                escape_html(caption)
            );
        }
        let _ = write!(markdown, "{fence}{language}\n{body}\n{fence}");

        DirectiveOutput::markdown(markdown)
    }
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Mermaid diagram, rendered client-side from `data-diagram`.
pub struct Mermaid;

impl BlockDirective for Mermaid {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn verbatim(&self) -> bool {
        true
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        let source = dedent(&node.body);
        DirectiveOutput::html(format!(
            r#"<div class="mermaid{}"{} data-diagram="{}"></div>"#,
            node.extra_classes(),
            node.id_attr(),
            BASE64_STANDARD.encode(source.trim().as_bytes())
        ))
    }
}
