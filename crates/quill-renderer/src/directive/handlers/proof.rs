//! Numbered statements (`prf:theorem`, `prf:lemma`, ...) and exercises.

use std::fmt::Write;

use crate::directive::{BlockDirective, DirectiveContext, DirectiveNode, DirectiveOutput};
use crate::util::escape_html;

use super::inline_title;

/// `prf:` kinds and their display names.
pub(crate) const PROOF_KINDS: &[(&str, &str)] = &[
    ("prf:theorem", "Theorem"),
    ("prf:lemma", "Lemma"),
    ("prf:definition", "Definition"),
    ("prf:corollary", "Corollary"),
    ("prf:proposition", "Proposition"),
    ("prf:axiom", "Axiom"),
    ("prf:conjecture", "Conjecture"),
    ("prf:criterion", "Criterion"),
    ("prf:example", "Example"),
    ("prf:remark", "Remark"),
    ("prf:observation", "Observation"),
    ("prf:property", "Property"),
    ("prf:assumption", "Assumption"),
    ("prf:algorithm", "Algorithm"),
    ("prf:proof", "Proof"),
];

/// Mathematical statement. Every kind except `prf:proof` is numbered
/// independently: Theorem 1, Lemma 1, Theorem 2, ...
pub struct Proof {
    name: &'static str,
    display: &'static str,
}

impl Proof {
    #[must_use]
    pub fn new(name: &'static str, display: &'static str) -> Self {
        Self { name, display }
    }

    fn kind(&self) -> &'static str {
        self.name.trim_start_matches("prf:")
    }
}

impl BlockDirective for Proof {
    fn name(&self) -> &str {
        self.name
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let kind = self.kind();
        let heading = if kind == "proof" || node.options.flag("nonumber") == Some(true) {
            self.display.to_owned()
        } else {
            format!("{} {}", self.display, ctx.next_number(self.name))
        };

        let mut html = format!(
            "<div class=\"proof proof-{kind}{}\"{}>\n<p class=\"proof-title\"><span class=\"proof-type\">{heading}</span>",
            node.extra_classes(),
            node.id_attr()
        );
        if !node.argument.is_empty() {
            let _ = write!(
                html,
                " <span class=\"proof-name\">({})</span>",
                inline_title(&node.argument)
            );
        }
        let _ = write!(
            html,
            "</p>\n<div class=\"proof-content\">\n\n{}\n\n</div>",
            node.body
        );
        if kind == "proof" {
            html.push_str("\n<span class=\"proof-qed\">&#9633;</span>");
        }
        html.push_str("\n</div>");

        DirectiveOutput::html(html)
    }
}

/// Numbered exercise. A `:label:` makes it referable from `solution`.
pub struct Exercise;

impl BlockDirective for Exercise {
    fn name(&self) -> &'static str {
        "exercise"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let number = ctx.next_number("exercise");
        if let Some(label) = node.anchor() {
            ctx.register_exercise(label, number);
        }

        let mut html = format!(
            "<div class=\"exercise{}\"{}>\n<p class=\"exercise-title\">Exercise {number}",
            node.extra_classes(),
            node.id_attr()
        );
        if !node.argument.is_empty() {
            let _ = write!(html, " ({})", inline_title(&node.argument));
        }
        let _ = write!(
            html,
            "</p>\n<div class=\"exercise-content\">\n\n{}\n\n</div>\n</div>",
            node.body
        );

        DirectiveOutput::html(html)
    }
}

/// Collapsible solution titled after the exercise named in its argument.
pub struct Solution;

impl BlockDirective for Solution {
    fn name(&self) -> &'static str {
        "solution"
    }

    fn render(&self, node: &DirectiveNode, ctx: &mut DirectiveContext) -> DirectiveOutput {
        let target = node.argument.trim();
        let title = match ctx.exercise_number(target) {
            Some(number) => format!("Solution to Exercise {number}"),
            None if target.is_empty() => "Solution".to_owned(),
            None => {
                tracing::warn!(exercise = target, "Solution refers to unknown exercise");
                ctx.warn(format!("Solution refers to unknown exercise '{target}'"));
                format!("Solution to {}", escape_html(target))
            }
        };

        let href = if target.is_empty() {
            String::new()
        } else {
            format!(r#" data-exercise="{}""#, escape_html(target))
        };

        DirectiveOutput::html(format!(
            "<details class=\"solution{}\"{}{href}>\n<summary>{title}</summary>\n<div class=\"solution-content\">\n\n{}\n\n</div>\n</details>",
            node.extra_classes(),
            node.id_attr(),
            node.body
        ))
    }
}
