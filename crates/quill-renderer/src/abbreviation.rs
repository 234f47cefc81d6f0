//! Abbreviation expansion.
//!
//! Wraps whole-word occurrences of frontmatter-declared abbreviations in
//! `<abbr title="...">` so readers get the expansion as a tooltip.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::math::{AMS_ENVIRONMENTS, dollar_spans};
use crate::regions::{code_spans, is_verbatim, map_between, protected_regions_where};
use crate::util::escape_html;

/// Text that must not be searched: HTML tags, link targets, directive
/// names, display math and AMS environments. Inline `$...$` is cut out
/// beforehand with the same rules the math stage uses.
fn skip_pattern() -> String {
    format!(
        r"<[^>\n]*>|\]\([^)\n]*\)|\{{[^}}\n]*\}}|\$\$[^$]*\$\$|\\begin\{{(?:{AMS_ENVIRONMENTS})\*?\}}[\s\S]*?\\end\{{(?:{AMS_ENVIRONMENTS})\*?\}}"
    )
}

/// Expands abbreviations in prose.
pub(crate) struct AbbreviationExpander {
    pattern: Regex,
    expansions: HashMap<String, String>,
}

impl AbbreviationExpander {
    /// Build an expander; `None` when there is nothing to expand.
    pub(crate) fn new(abbreviations: &[(String, String)]) -> Option<Self> {
        let mut terms: Vec<&(String, String)> = abbreviations
            .iter()
            .filter(|(abbr, _)| !abbr.is_empty())
            .collect();
        if terms.is_empty() {
            return None;
        }

        // Longest first so that `CNN` wins over `NN`.
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let alternation = terms
            .iter()
            .map(|(abbr, _)| word_pattern(abbr))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("({})|(?:{alternation})", skip_pattern())).ok()?;

        let expansions = abbreviations
            .iter()
            .rev()
            .map(|(abbr, expansion)| (abbr.clone(), expansion.clone()))
            .collect();

        Some(Self {
            pattern,
            expansions,
        })
    }

    /// Expand abbreviations outside code.
    pub(crate) fn expand(&self, text: &str) -> String {
        let protected = protected_regions_where(text, |name| is_verbatim(name) || name == "math");
        map_between(text, &protected, |block| {
            map_between(block, &code_spans(block), |chunk| {
                map_between(chunk, &dollar_spans(chunk), |prose| self.replace(prose))
            })
        })
    }

    fn replace(&self, chunk: &str) -> String {
        self.pattern
            .replace_all(chunk, |caps: &Captures<'_>| {
                let matched = &caps[0];
                if caps.get(1).is_some() {
                    return matched.to_owned();
                }
                match self.expansions.get(matched) {
                    Some(expansion) => format!(
                        r#"<abbr title="{}">{}</abbr>"#,
                        escape_html(expansion),
                        escape_html(matched)
                    ),
                    None => matched.to_owned(),
                }
            })
            .into_owned()
    }
}

/// Escaped abbreviation with word boundaries on word-character edges only.
fn word_pattern(abbr: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let leading = abbr.chars().next().is_some_and(is_word);
    let trailing = abbr.chars().last().is_some_and(is_word);

    format!(
        "{}{}{}",
        if leading { r"\b" } else { "" },
        regex::escape(abbr),
        if trailing { r"\b" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expander(pairs: &[(&str, &str)]) -> AbbreviationExpander {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(a, e)| ((*a).to_owned(), (*e).to_owned()))
            .collect();
        AbbreviationExpander::new(&pairs).unwrap()
    }

    #[test]
    fn test_no_abbreviations() {
        assert!(AbbreviationExpander::new(&[]).is_none());
    }

    #[test]
    fn test_whole_word_only() {
        let exp = expander(&[("NN", "neural network")]);
        assert_eq!(
            exp.expand("An NN, not NNs."),
            r#"An <abbr title="neural network">NN</abbr>, not NNs."#
        );
    }

    #[test]
    fn test_longest_first() {
        let exp = expander(&[("NN", "neural network"), ("CNN", "convolutional NN")]);
        assert_eq!(
            exp.expand("CNN and NN"),
            r#"<abbr title="convolutional NN">CNN</abbr> and <abbr title="neural network">NN</abbr>"#
        );
    }

    #[test]
    fn test_skips_code() {
        let exp = expander(&[("GPU", "graphics processing unit")]);
        let out = exp.expand("`GPU`\n```\nGPU\n```");
        assert_eq!(out, "`GPU`\n```\nGPU\n```");
    }

    #[test]
    fn test_skips_link_targets_and_tags() {
        let exp = expander(&[("ML", "machine learning")]);
        let out = exp.expand(r#"[ML](https://x.org/ML) <img alt="ML">"#);
        assert_eq!(
            out,
            r#"[<abbr title="machine learning">ML</abbr>](https://x.org/ML) <img alt="ML">"#
        );
    }

    #[test]
    fn test_skips_math() {
        let exp = expander(&[("ML", "machine learning")]);
        let out = exp.expand("ML: $ML$ and\n```{math}\nML\n```");
        assert_eq!(
            out,
            "<abbr title=\"machine learning\">ML</abbr>: $ML$ and\n```{math}\nML\n```"
        );
    }

    #[test]
    fn test_skips_ams_environments() {
        let exp = expander(&[("ML", "machine learning")]);
        let text = "\\begin{align}\nL_ML &= 1 + ML\n\\end{align}\n\\begin{equation*}ML\\end{equation*}";
        assert_eq!(exp.expand(text), text);
        assert_eq!(
            exp.expand("\\begin{align}ML\\end{align} ML"),
            "\\begin{align}ML\\end{align} <abbr title=\"machine learning\">ML</abbr>"
        );
    }

    #[test]
    fn test_prices_are_not_math() {
        let exp = expander(&[("ML", "machine learning")]);
        assert_eq!(
            exp.expand("costs $5 for ML and $10"),
            r#"costs $5 for <abbr title="machine learning">ML</abbr> and $10"#
        );
    }

    #[test]
    fn test_non_word_edges() {
        let exp = expander(&[("C++", "C plus plus")]);
        assert_eq!(
            exp.expand("I like C++."),
            r#"I like <abbr title="C plus plus">C++</abbr>."#
        );
    }
}
