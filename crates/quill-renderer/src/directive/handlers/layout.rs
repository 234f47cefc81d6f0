//! Cards and grids.

use std::fmt::Write;

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};
use crate::util::escape_html;

use super::inline_title;

/// Card with optional header (argument), footer and link.
pub struct Card;

impl BlockDirective for Card {
    fn name(&self) -> &'static str {
        "card"
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        DirectiveOutput::html(render_card(node, ""))
    }
}

/// Grid container. The argument lists column counts per breakpoint,
/// e.g. `1 2 2 3`; the widest layout uses the last one.
pub struct Grid;

impl BlockDirective for Grid {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        let columns: Vec<&str> = node
            .argument
            .split_whitespace()
            .filter(|c| c.chars().all(|ch| ch.is_ascii_digit()))
            .collect();
        let widest = columns.last().copied().unwrap_or("1");

        let mut html = format!(
            r#"<div class="grid{}"{} style="--grid-columns: {widest}""#,
            node.extra_classes(),
            node.id_attr()
        );
        if !columns.is_empty() {
            let _ = write!(html, r#" data-columns="{}""#, columns.join(" "));
        }
        if let Some(gutter) = node.options.value("gutter") {
            let _ = write!(html, r#" data-gutter="{}""#, escape_html(gutter));
        }
        let _ = write!(html, ">\n\n{}\n\n</div>", node.body);

        DirectiveOutput::html(html)
    }
}

/// Plain grid cell.
pub struct GridItem;

impl BlockDirective for GridItem {
    fn name(&self) -> &'static str {
        "grid-item"
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        DirectiveOutput::html(format!(
            "<div class=\"grid-item{}\"{}>\n\n{}\n\n</div>",
            node.extra_classes(),
            node.id_attr(),
            node.body
        ))
    }
}

/// Grid cell holding a card.
pub struct GridItemCard;

impl BlockDirective for GridItemCard {
    fn name(&self) -> &'static str {
        "grid-item-card"
    }

    fn render(&self, node: &DirectiveNode, _ctx: &mut DirectiveContext) -> DirectiveOutput {
        DirectiveOutput::html(format!(
            "<div class=\"grid-item\">\n{}\n</div>",
            render_card(node, " grid-item-card")
        ))
    }
}

fn render_card(node: &DirectiveNode, extra: &str) -> String {
    let link = node.options.value("link");
    let mut html = format!(
        r#"<div class="card{extra}{}{}"{}>"#,
        if link.is_some() { " card-clickable" } else { "" },
        node.extra_classes(),
        node.id_attr()
    );

    if !node.argument.is_empty() {
        let _ = write!(
            html,
            "\n<div class=\"card-header\">{}</div>",
            inline_title(&node.argument)
        );
    }

    let _ = write!(html, "\n<div class=\"card-body\">\n\n{}\n\n</div>", node.body);

    if let Some(footer) = node.options.value("footer") {
        let _ = write!(
            html,
            "\n<div class=\"card-footer\">{}</div>",
            inline_title(footer)
        );
    }
    if let Some(link) = link {
        let _ = write!(
            html,
            "\n<a class=\"card-link\" href=\"{}\" aria-label=\"{}\"></a>",
            escape_html(link),
            escape_html(if node.argument.is_empty() { link } else { &node.argument })
        );
    }

    html.push_str("\n</div>");
    html
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn html(output: DirectiveOutput) -> String {
        match output {
            DirectiveOutput::Html(html) => html,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_card_with_header_and_footer() {
        let node = DirectiveNode::new("card")
            .with_argument("Title")
            .with_option("footer", "Foot")
            .with_body("Body");
        let out = html(Card.render(&node, &mut DirectiveContext::new()));
        assert_eq!(
            out,
            "<div class=\"card\">\n<div class=\"card-header\">Title</div>\n<div class=\"card-body\">\n\nBody\n\n</div>\n<div class=\"card-footer\">Foot</div>\n</div>"
        );
    }

    #[test]
    fn test_card_link() {
        let node = DirectiveNode::new("card").with_option("link", "https://example.com");
        let out = html(Card.render(&node, &mut DirectiveContext::new()));
        assert!(out.starts_with("<div class=\"card card-clickable\">"));
        assert!(out.contains("<a class=\"card-link\" href=\"https://example.com\""));
    }

    #[test]
    fn test_grid_columns() {
        let node = DirectiveNode::new("grid").with_argument("1 2 3").with_body("cells");
        let out = html(Grid.render(&node, &mut DirectiveContext::new()));
        assert_eq!(
            out,
            "<div class=\"grid\" style=\"--grid-columns: 3\" data-columns=\"1 2 3\">\n\ncells\n\n</div>"
        );
    }

    #[test]
    fn test_grid_item_card() {
        let node = DirectiveNode::new("grid-item-card").with_argument("A").with_body("b");
        let out = html(GridItemCard.render(&node, &mut DirectiveContext::new()));
        assert!(out.starts_with("<div class=\"grid-item\">\n<div class=\"card grid-item-card\">"));
        assert!(out.ends_with("</div>\n</div>"));
    }
}
