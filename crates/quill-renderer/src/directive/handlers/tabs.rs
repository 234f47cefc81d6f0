//! Tabbed content.
//!
//! ```markdown
//! ::::{tab-set}
//! :::{tab-item} macOS
//! Install with Homebrew.
//! :::
//! :::{tab-item} Linux
//! Install with apt.
//! :::
//! ::::
//! ```
//!
//! Each `tab-item` is rendered first and parked in the context; the
//! enclosing `tab-set` then emits the button row and one panel per item.

use std::fmt::Write;

use crate::directive::{
    BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput, TabItem,
};

use super::inline_title;

/// Container collecting `tab-item` children.
pub struct TabSet;

impl BlockDirective for TabSet {
    fn name(&self) -> &'static str {
        "tab-set"
    }

    fn enter(&self, ctx: &mut DirectiveContext) {
        ctx.open_tab_set();
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let (set_id, tabs) = ctx.close_tab_set();
        if tabs.is_empty() {
            ctx.warn("tab-set without tab-item children");
        }

        let selected = tabs.iter().position(|tab| tab.selected).unwrap_or(0);
        let mut output = String::with_capacity(512);

        let _ = write!(
            output,
            r#"<div class="tab-set{}" id="tab-set-{set_id}">"#,
            node.extra_classes()
        );

        output.push_str("\n<div class=\"tab-buttons\" role=\"tablist\">");
        for (idx, tab) in tabs.iter().enumerate() {
            let is_selected = idx == selected;
            let _ = write!(
                output,
                r#"<button class="tab-button{}" role="tab" id="tab-{}" aria-controls="tab-panel-{}" aria-selected="{is_selected}" tabindex="{}">{}</button>"#,
                if is_selected { " active" } else { "" },
                tab.id,
                tab.id,
                if is_selected { "0" } else { "-1" },
                tab.label
            );
        }
        output.push_str("</div>");

        // Stray content between items stays visible above the panels.
        if !node.body.trim().is_empty() {
            let _ = write!(output, "\n\n{}\n", node.body);
        }

        for (idx, tab) in tabs.iter().enumerate() {
            let hidden = if idx == selected { "" } else { " hidden" };
            let _ = write!(
                output,
                "\n<div class=\"tab-panel{}\" role=\"tabpanel\" id=\"tab-panel-{}\" aria-labelledby=\"tab-{}\"{hidden}>\n\n{}\n\n</div>",
                tab.classes, tab.id, tab.id, tab.body
            );
        }
        output.push_str("\n</div>");

        DirectiveOutput::html(output)
    }
}

/// One tab. Renders nothing itself unless it stands outside a `tab-set`.
pub struct TabItemDirective;

impl BlockDirective for TabItemDirective {
    fn name(&self) -> &'static str {
        "tab-item"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let label = if node.argument.is_empty() {
            "Tab".to_owned()
        } else {
            inline_title(strip_quotes(&node.argument))
        };

        let item = TabItem {
            id: 0,
            label,
            selected: node.options.is_set("selected"),
            body: node.body.clone(),
            classes: node.extra_classes(),
        };

        match ctx.push_tab(item) {
            Ok(()) => DirectiveOutput::html(String::new()),
            Err(item) => {
                tracing::warn!("tab-item outside of a tab-set");
                ctx.warn("tab-item outside of a tab-set rendered as a plain panel");
                DirectiveOutput::html(format!(
                    "<div class=\"tab-panel{}\">\n<p class=\"tab-label\">{}</p>\n\n{}\n\n</div>",
                    item.classes, item.label, item.body
                ))
            }
        }
    }
}

/// Strip surrounding quotes (single or double) from a string.
fn strip_quotes(s: &str) -> &str {
    let is_quoted =
        (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\''));
    if is_quoted && s.len() >= 2 {
        return &s[1..s.len() - 1];
    }
    s
}
