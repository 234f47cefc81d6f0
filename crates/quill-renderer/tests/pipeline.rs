use pretty_assertions::assert_eq;
use pulldown_cmark::{Options, Parser, html};
use quill_renderer::{ArticleIdentity, PathMode, RenderOptions, RenderedBlogPost, render_article};

fn render(raw: &str) -> RenderedBlogPost {
    render_article(raw, &ArticleIdentity::new("ai", "post1"), &RenderOptions::default())
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

#[test]
fn test_math_directive_and_reference() {
    let post = render("```{math}\n:label: eq1\nx=y\n```\n\nSee {eq}`eq1`.\n");

    assert!(post.content.contains(r#"<div class="equation-block" id="eq1">"#));
    assert!(post.content.contains(r#"<div class="equation-content">\[x=y\]</div>"#));
    assert!(post.content.contains(r#"<div class="equation-number">(1)</div>"#));
    assert!(post.content.contains(r##"<a class="equation-ref" href="#eq1">(1)</a>"##));
    assert!(post.warnings.is_empty());
}

#[test]
fn test_numbering_across_syntaxes() {
    let raw = r"```{math}
:label: eq-a
a
```

$$ b $$ (eq-b)

\begin{equation}
c \label{eq-c}
\end{equation}

$$
d \label{eq-d}
$$

$$ unlabeled $$

Refs {eq}`eq-d` {eq}`eq-c` {eq}`eq-b` {eq}`eq-a`.
";
    let post = render(raw);

    for (label, number) in [("eq-a", 1), ("eq-b", 2), ("eq-c", 3), ("eq-d", 4)] {
        assert!(
            post.content
                .contains(&format!(r##"<a class="equation-ref" href="#{label}">({number})</a>"##)),
            "{label} should be ({number})"
        );
    }
    assert_eq!(post.content.matches("class=\"equation-block\"").count(), 5);
    assert_eq!(post.content.matches("class=\"equation-number\"").count(), 4);
}

#[test]
fn test_forward_reference() {
    let post = render("As {eq}`later` shows:\n\n$$ y $$ (later)\n");
    assert!(post.content.contains(r##"<a class="equation-ref" href="#later">(1)</a>"##));
}

#[test]
fn test_unresolved_reference_pending() {
    let post = render("See {eq}`nope` and [](#nada).");

    assert!(post.content.contains(
        r##"<a class="equation-ref equation-ref-pending" href="#nope" data-label="nope">(nope)</a>"##
    ));
    assert!(post.content.contains(r#"data-label="nada""#));
    assert_eq!(post.warnings.len(), 1);
}

#[test]
fn test_reference_syntax_in_inline_code_literal() {
    let post = render("Write `[](#eq-a)` or ``{kbd}`C` `` in prose.");

    assert!(post.content.contains("<code>[](#eq-a)</code>"));
    assert!(post.content.contains("<code>{kbd}`C`</code>"));
    assert!(!post.content.contains("equation-ref"));
    assert!(!post.content.contains("<kbd"));
    assert!(post.warnings.is_empty());
}

#[test]
fn test_inline_math() {
    let post = render("Energy $E=mc^2$ costs $5 and $10.");
    assert!(post.content.contains(r#"<span class="math-inline">\(E=mc^2\)</span>"#));
    assert!(post.content.contains("costs $5 and $10."));
}

#[test]
fn test_note_admonition() {
    let post = render(":::{note}\nHello\n:::");

    assert!(post.content.contains(r#"<div class="admonition note">"#));
    assert!(post.content.contains(r#"<p class="admonition-title">Note</p>"#));
    assert!(post.content.contains("<p>Hello</p>"));
}

#[test]
fn test_fence_families_equivalent() {
    let colon = render(":::{warning} Careful\nBody *text*\n:::");
    let backtick = render("```{warning} Careful\nBody *text*\n```");
    assert_eq!(colon.content, backtick.content);
}

#[test]
fn test_two_level_same_name_nesting() {
    let post = render("::::{note}\n:::{note}\nInner\n:::\nOuter tail\n::::");

    let outer = position(&post.content, "admonition note");
    let inner = outer + 1 + position(&post.content[outer + 1..], "admonition note");
    let inner_text = position(&post.content, "<p>Inner</p>");
    let tail = position(&post.content, "<p>Outer tail</p>");

    assert!(outer < inner && inner < inner_text && inner_text < tail);
    assert!(post.content.trim_end().ends_with("</div>"));
    assert!(post.warnings.is_empty());
}

#[test]
fn test_three_level_nesting() {
    let raw = "::::{note}\n:::{dropdown} Inner\n```{tip}\nDeep\n```\n:::\nOuter tail\n::::";
    let post = render(raw);

    let note = position(&post.content, r#"<div class="admonition note">"#);
    let dropdown = position(&post.content, r#"<details class="dropdown">"#);
    let tip = position(&post.content, r#"<div class="admonition tip">"#);
    let deep = position(&post.content, "<p>Deep</p>");
    let details_end = position(&post.content, "</details>");
    let tail = position(&post.content, "<p>Outer tail</p>");

    assert!(note < dropdown && dropdown < tip && tip < deep);
    assert!(deep < details_end && details_end < tail);
}

#[test]
fn test_unclosed_directive_kept() {
    let post = render(":::{note}\nHello");
    assert!(post.content.contains(":::{note}"));
    assert!(post.content.contains("Hello"));
    assert_eq!(post.warnings.len(), 1);
}

#[test]
fn test_unknown_directive_generic() {
    let post = render(":::{sidebar} Aside\nSome *text*\n:::");
    assert!(post.content.contains(r#"<div class="directive directive-sidebar" data-directive="sidebar">"#));
    assert!(post.content.contains("<p>Some <em>text</em></p>"));
}

#[test]
fn test_figure_missing_target() {
    let post = render(":::{figure} #undefined\nCaption\n:::");

    assert!(post.content.contains(
        r#"<div class="figure-not-found" data-target="undefined">Figure target not found: undefined</div>"#
    ));
    assert!(!post.content.contains("<img"));
    assert_eq!(post.warnings.len(), 1);
}

#[test]
fn test_figure_target_rewritten() {
    let post = render("(fig-a)=![Plot](./images/a.png)\n\n```{figure} #fig-a\nA *plot*.\n```");

    assert!(post.content.contains(r#"<figure class="figure">"#));
    assert!(post.content.contains(r#"<img src="/blogs/ai/post1/images/a.png" alt="Plot" loading="lazy">"#));
    assert!(post.content.contains("<p>A <em>plot</em>.</p>"));
    assert!(!post.content.contains("(fig-a)="));
}

#[test]
fn test_code_block_keeps_language() {
    let post = render("```{code-block} python\nprint(1)\n```");
    assert!(post.content.contains(r#"<pre><code class="language-python">print(1)"#));
}

#[test]
fn test_code_block_not_processed() {
    let post = render("```{code} markdown\n$x$ {kbd}`C` :::{note}\n```");
    assert!(post.content.contains("$x$ {kbd}`C` :::{note}"));
    assert!(!post.content.contains("math-inline"));
}

#[test]
fn test_mermaid_encoded() {
    let post = render("```{mermaid}\ngraph TD\n  A --> B\n```");
    assert!(post.content.contains(r#"<div class="mermaid" data-diagram=""#));
    assert!(!post.content.contains("A --"));
}

#[test]
fn test_glossary_and_term_role() {
    let post = render(
        "Use the {term}`learning rate`.\n\n:::{glossary}\nLearning rate\n  Step size.\n:::",
    );
    assert!(post.content.contains(r##"<a class="glossary-term" href="#term-learning-rate">learning rate</a>"##));
    assert!(post.content.contains(r#"<dt id="term-learning-rate">Learning rate</dt>"#));
}

#[test]
fn test_exercise_and_solution() {
    let post = render(
        ":::{exercise} Warm-up\n:label: ex-warm\nCompute it.\n:::\n\n:::{solution} ex-warm\nDone.\n:::",
    );
    assert!(post.content.contains("Exercise 1 (Warm-up)"));
    assert!(post.content.contains("<summary>Solution to Exercise 1</summary>"));
}

#[test]
fn test_abbreviations() {
    let post = render(
        "---\nabbreviations:\n  GPU: Graphics Processing Unit\n---\nA GPU and `GPU`.",
    );
    assert!(post.content.contains(r#"<abbr title="Graphics Processing Unit">GPU</abbr> and <code>GPU</code>"#));
}

#[test]
fn test_duplicate_frontmatter_keys() {
    let post = render("---\nblog_title: First\nblog_title: Second\n---\nx");
    assert_eq!(post.title, "First");
    assert_eq!(post.warnings.len(), 1);
}

#[test]
fn test_unparsable_frontmatter_degrades() {
    let post = render("---\nblog_title: [unclosed\n---\nBody");
    assert_eq!(post.title, "post1");
    assert!(post.raw_body.starts_with("---"));
    assert_eq!(post.warnings.len(), 1);
}

#[test]
fn test_path_modes() {
    let raw = r#"<img src="./images/a.png">"#;
    let local = render(raw);
    assert!(local.content.contains(r#"src="/blogs/ai/post1/images/a.png""#));

    let options = RenderOptions::default().with_path_mode(PathMode::Published {
        base_url: "https://raw.example.com/blog".to_owned(),
    });
    let published = render_article(raw, &ArticleIdentity::new("ai", "post1"), &options);
    assert!(
        published
            .content
            .contains(r#"src="https://raw.example.com/blog/blogs/ai/post1/images/a.png""#)
    );
}

#[test]
fn test_plain_markdown_untouched() {
    let raw = "Some *emphasis* and a [link](https://example.com).\n\n- one\n- two\n\n```rust\nlet x = 1;\n```\n\n> quote\n";
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM;
    let mut expected = String::new();
    html::push_html(&mut expected, Parser::new_ext(raw, options));

    assert_eq!(render(raw).content, expected);
}
