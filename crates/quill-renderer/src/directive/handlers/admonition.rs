//! Admonitions and dropdowns.

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};

use super::inline_title;

/// Callout kinds rendered as `<div class="admonition KIND">`.
pub(crate) const ADMONITION_KINDS: &[&str] = &[
    "note",
    "tip",
    "hint",
    "important",
    "warning",
    "caution",
    "attention",
    "danger",
    "error",
    "seealso",
    "admonition",
];

/// Callout box such as `note` or `warning`.
///
/// The title is the directive argument, or the capitalized kind when the
/// argument is empty.
pub struct Admonition {
    kind: &'static str,
}

impl Admonition {
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    fn default_title(&self) -> String {
        match self.kind {
            "seealso" => "See also".to_owned(),
            kind => {
                let mut chars = kind.chars();
                chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        }
    }
}

impl BlockDirective for Admonition {
    fn name(&self) -> &str {
        self.kind
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        let title = if node.argument.is_empty() {
            self.default_title()
        } else {
            inline_title(&node.argument)
        };

        DirectiveOutput::html(format!(
            "<div class=\"admonition {}{}\"{}>\n<p class=\"admonition-title\">{title}</p>\n\n{}\n\n</div>",
            self.kind,
            node.extra_classes(),
            node.id_attr(),
            node.body
        ))
    }
}

/// Collapsible `<details>` block. `:open:` expands it initially.
pub struct Dropdown;

impl BlockDirective for Dropdown {
    fn name(&self) -> &'static str {
        "dropdown"
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        let title = if node.argument.is_empty() {
            "Details".to_owned()
        } else {
            inline_title(&node.argument)
        };
        let open = if node.options.is_set("open") { " open" } else { "" };

        DirectiveOutput::html(format!(
            "<details class=\"dropdown{}\"{}{open}>\n<summary>{title}</summary>\n<div class=\"dropdown-content\">\n\n{}\n\n</div>\n</details>",
            node.extra_classes(),
            node.id_attr(),
            node.body
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(handler: &dyn BlockDirective, node: &DirectiveNode) -> String {
        let mut ctx = DirectiveContext::new();
        match handler.render(node, &mut ctx) {
            DirectiveOutput::Html(html) => html,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_note_default_title() {
        let html = render(&Admonition::new("note"), &DirectiveNode::new("note").with_body("Hello"));
        assert_eq!(
            html,
            "<div class=\"admonition note\">\n<p class=\"admonition-title\">Note</p>\n\nHello\n\n</div>"
        );
    }

    #[test]
    fn test_seealso_title() {
        let html = render(&Admonition::new("seealso"), &DirectiveNode::new("seealso"));
        assert!(html.contains("<p class=\"admonition-title\">See also</p>"));
    }

    #[test]
    fn test_custom_title_and_class() {
        let node = DirectiveNode::new("warning")
            .with_argument("Mind the *gap*")
            .with_option("class", "wide");
        let html = render(&Admonition::new("warning"), &node);
        assert!(html.starts_with("<div class=\"admonition warning wide\">"));
        assert!(html.contains("<p class=\"admonition-title\">Mind the <em>gap</em></p>"));
    }

    #[test]
    fn test_dropdown_open() {
        let node = DirectiveNode::new("dropdown")
            .with_argument("More")
            .with_option("open", "")
            .with_body("Hidden");
        let html = render(&Dropdown, &node);
        assert_eq!(
            html,
            "<details class=\"dropdown\" open>\n<summary>More</summary>\n<div class=\"dropdown-content\">\n\nHidden\n\n</div>\n</details>"
        );
    }

    #[test]
    fn test_dropdown_default_title() {
        let html = render(&Dropdown, &DirectiveNode::new("dropdown"));
        assert!(html.contains("<summary>Details</summary>"));
        assert!(!html.contains(" open"));
    }
}
