//! YAML frontmatter splitting.
//!
//! An article starts with a `---` line, then YAML, then a closing `---` (or
//! `...`) line. Authors occasionally repeat a top-level key, which the YAML
//! parser rejects, so duplicates are dropped (first occurrence wins) before
//! parsing. A block that still fails to parse yields empty metadata and the
//! whole input as body.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

/// Top-level `key:` line.
static TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_\- ]*?)\s*:(?:\s|$)").unwrap());

/// Error parsing a frontmatter block. Always recovered by the caller.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FrontmatterError {
    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frontmatter is not a mapping")]
    NotMapping,
}

/// Metadata read from the frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ArticleMeta {
    /// `blogpost` gate: the article is only listed when true.
    pub blogpost: bool,
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    /// Abbreviation to expansion, in declaration order.
    pub abbreviations: Vec<(String, String)>,
    /// Math macro name to LaTeX replacement, in declaration order.
    pub math_macros: Vec<(String, String)>,
}

/// Split raw article text into metadata and body.
///
/// Never fails: problems are pushed to `warnings` and degrade to empty metadata.
pub(crate) fn split<'a>(raw: &'a str, warnings: &mut Vec<String>) -> (ArticleMeta, &'a str) {
    let Some((yaml, body)) = find_block(raw) else {
        return (ArticleMeta::default(), raw);
    };

    let yaml = drop_duplicate_keys(yaml, warnings);

    match parse_meta(&yaml) {
        Ok(meta) => (meta, body),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unparsable frontmatter");
            warnings.push(format!("Ignoring unparsable frontmatter: {e}"));
            (ArticleMeta::default(), raw)
        }
    }
}

/// Locate the YAML region and the body that follows it.
fn find_block(raw: &str) -> Option<(&str, &str)> {
    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&raw[yaml_start..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Drop repeated top-level key lines, keeping the first occurrence.
///
/// Indented continuation lines below a dropped key are kept as they are.
fn drop_duplicate_keys(yaml: &str, warnings: &mut Vec<String>) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(yaml.len());

    for line in yaml.split_inclusive('\n') {
        if let Some(caps) = TOP_LEVEL_KEY.captures(line) {
            let key = caps[1].trim();
            if !seen.insert(key.to_owned()) {
                tracing::warn!(key, "Dropping duplicate frontmatter key");
                warnings.push(format!("Dropping duplicate frontmatter key '{key}'"));
                continue;
            }
        }
        out.push_str(line);
    }

    out
}

fn parse_meta(yaml: &str) -> Result<ArticleMeta, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(ArticleMeta::default());
    }

    let value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(ArticleMeta::default());
    }
    if !value.is_mapping() {
        return Err(FrontmatterError::NotMapping);
    }

    let description = value
        .get("myst")
        .and_then(|myst| myst.get("html_meta"))
        .and_then(|meta| meta.get("description lang=en"))
        .or_else(|| value.get("description"))
        .and_then(scalar_string);

    Ok(ArticleMeta {
        blogpost: value.get("blogpost").is_some_and(truthy),
        title: value.get("blog_title").and_then(scalar_string),
        date: value.get("date").and_then(scalar_string),
        author: value.get("author").and_then(scalar_string),
        thumbnail: value.get("thumbnail").and_then(scalar_string),
        tags: value.get("tags").map(tag_list).unwrap_or_default(),
        language: value.get("language").and_then(scalar_string),
        description,
        abbreviations: value.get("abbreviations").map(pairs).unwrap_or_default(),
        math_macros: value.get("math").map(pairs).unwrap_or_default(),
    })
}

/// Stringify a scalar; empty strings and non-scalars are absent.
fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    }
}

/// Tags from a comma-separated string or a sequence.
fn tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect(),
        Value::Sequence(items) => items.iter().filter_map(scalar_string).collect(),
        _ => Vec::new(),
    }
}

/// Ordered string pairs from a mapping.
fn pairs(value: &Value) -> Vec<(String, String)> {
    let Value::Mapping(map) = value else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(k, v)| Some((scalar_string(k)?, scalar_string(v)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_basic() {
        let raw = "---\nblogpost: true\nblog_title: Hello\ntags: ml, ai , \n---\nBody text\n";
        let mut warnings = Vec::new();
        let (meta, body) = split(raw, &mut warnings);

        assert!(meta.blogpost);
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.tags, vec!["ml".to_owned(), "ai".to_owned()]);
        assert_eq!(body, "Body text\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_split_no_frontmatter() {
        let mut warnings = Vec::new();
        let (meta, body) = split("# Title\n\nText", &mut warnings);
        assert_eq!(meta, ArticleMeta::default());
        assert_eq!(body, "# Title\n\nText");
    }

    #[test]
    fn test_split_unclosed_frontmatter() {
        let mut warnings = Vec::new();
        let (meta, body) = split("---\nblog_title: x\nno end", &mut warnings);
        assert_eq!(meta, ArticleMeta::default());
        assert_eq!(body, "---\nblog_title: x\nno end");
    }

    #[test]
    fn test_split_dot_terminator() {
        let mut warnings = Vec::new();
        let (meta, body) = split("---\nauthor: Ada\n...\nBody", &mut warnings);
        assert_eq!(meta.author.as_deref(), Some("Ada"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let raw = "---\nblog_title: First\nauthor: A\nblog_title: Second\n---\nBody";
        let mut warnings = Vec::new();
        let (meta, _) = split(raw, &mut warnings);

        assert_eq!(meta.title.as_deref(), Some("First"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("blog_title"));
    }

    #[test]
    fn test_unparsable_falls_back_to_body() {
        let raw = "---\nblog_title: [unclosed\n---\nBody";
        let mut warnings = Vec::new();
        let (meta, body) = split(raw, &mut warnings);

        assert_eq!(meta, ArticleMeta::default());
        assert_eq!(body, raw);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_description_from_html_meta() {
        let raw = "---\nmyst:\n  html_meta:\n    \"description lang=en\": About things\n---\n";
        let mut warnings = Vec::new();
        let (meta, _) = split(raw, &mut warnings);
        assert_eq!(meta.description.as_deref(), Some("About things"));
    }

    #[test]
    fn test_abbreviations_keep_order() {
        let raw = "---\nabbreviations:\n  NN: neural network\n  CNN: convolutional neural network\n---\n";
        let mut warnings = Vec::new();
        let (meta, _) = split(raw, &mut warnings);
        assert_eq!(
            meta.abbreviations,
            vec![
                ("NN".to_owned(), "neural network".to_owned()),
                ("CNN".to_owned(), "convolutional neural network".to_owned()),
            ]
        );
    }

    #[test]
    fn test_date_and_tag_sequence() {
        let raw = "---\ndate: 2024-03-01\ntags:\n  - rust\n  - 42\n---\n";
        let mut warnings = Vec::new();
        let (meta, _) = split(raw, &mut warnings);
        assert_eq!(meta.date.as_deref(), Some("2024-03-01"));
        assert_eq!(meta.tags, vec!["rust".to_owned(), "42".to_owned()]);
    }

    #[test]
    fn test_math_macros() {
        let raw = "---\nmath:\n  '\\R': '\\mathbb{R}'\n---\n";
        let mut warnings = Vec::new();
        let (meta, _) = split(raw, &mut warnings);
        assert_eq!(
            meta.math_macros,
            vec![("\\R".to_owned(), "\\mathbb{R}".to_owned())]
        );
    }

    #[test]
    fn test_empty_frontmatter() {
        let mut warnings = Vec::new();
        let (meta, body) = split("---\n---\nBody", &mut warnings);
        assert_eq!(meta, ArticleMeta::default());
        assert_eq!(body, "Body");
    }
}
