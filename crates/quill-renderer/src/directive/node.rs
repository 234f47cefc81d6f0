//! Parsed directive blocks.

use std::sync::LazyLock;

use regex::Regex;

/// `:key: value` option line.
static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:([A-Za-z][\w\-]*):(?:\s+(.*?))?\s*$").unwrap());

/// `key: value` line inside a `---` option block.
static YAML_OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z][\w\-]*)\s*:(?:\s+(.*?))?\s*$").unwrap());

/// Directive options in source order.
///
/// # Example
///
/// ```
/// use quill_renderer::directive::DirectiveOptions;
///
/// let options = DirectiveOptions::default()
///     .with("label", "eq-loss")
///     .with("enumerated", "false");
///
/// assert_eq!(options.get("label"), Some("eq-loss"));
/// assert_eq!(options.flag("enumerated"), Some(false));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    items: Vec<(String, String)>,
}

impl DirectiveOptions {
    /// Add an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an option in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.push((key.into(), value.into()));
    }

    /// Value of the first option named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty value of `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Boolean option. A bare `:open:` counts as `true`.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        match value.to_ascii_lowercase().as_str() {
            "" | "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    /// Check if `key` is set to a true value.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.flag(key) == Some(true)
    }

    /// Iterate over options in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// A directive ready for rendering.
///
/// `body` is already processed for nested directives unless the handler is
/// verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveNode {
    /// Directive name, e.g. `note` or `prf:theorem`.
    pub name: String,
    /// Text after `{name}` on the opening fence.
    pub argument: String,
    pub options: DirectiveOptions,
    pub body: String,
}

impl DirectiveNode {
    /// Create a node with an empty argument and body.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = argument.into();
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Extra CSS classes from `:class:`, with a leading space.
    #[must_use]
    pub fn extra_classes(&self) -> String {
        self.options
            .value("class")
            .map(|class| format!(" {}", crate::util::escape_html(class)))
            .unwrap_or_default()
    }

    /// `id` attribute from `:name:` or `:label:`, with a leading space.
    #[must_use]
    pub fn id_attr(&self) -> String {
        self.anchor()
            .map(|id| format!(r#" id="{}""#, crate::util::escape_html(id)))
            .unwrap_or_default()
    }

    /// Anchor from `:label:` or `:name:`.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.options
            .value("label")
            .or_else(|| self.options.value("name"))
    }
}

/// Split directive content into leading options and body.
///
/// Options are the `:key: value` lines before the first line that is
/// neither blank nor an option; once the body starts, later option-shaped
/// lines belong to the body. A leading `---` block with `key: value` lines
/// is accepted as well.
pub(crate) fn split_options(content: &str) -> (DirectiveOptions, &str) {
    let mut options = DirectiveOptions::default();
    let mut offset = 0;
    let mut lines = content.split_inclusive('\n').peekable();

    // Optional `---` block first.
    if lines.peek().is_some_and(|line| line.trim() == "---") {
        let mut block = Vec::new();
        let mut block_len = lines.peek().map_or(0, |line| line.len());
        let mut closed = false;

        for line in content.split_inclusive('\n').skip(1) {
            block_len += line.len();
            if line.trim() == "---" {
                closed = true;
                break;
            }
            block.push(line);
        }

        if closed {
            for line in block {
                if let Some(caps) = YAML_OPTION_LINE.captures(line.trim_end()) {
                    let value = caps.get(2).map_or("", |m| m.as_str());
                    options.insert(&caps[1], unquote(value));
                }
            }
            offset = block_len;
            lines = content[offset..].split_inclusive('\n').peekable();
        }
    }

    for line in lines {
        if line.trim().is_empty() {
            offset += line.len();
            continue;
        }
        let Some(caps) = OPTION_LINE.captures(line.trim_end()) else {
            break;
        };
        let value = caps.get(2).map_or("", |m| m.as_str());
        options.insert(&caps[1], value);
        offset += line.len();
    }

    (options, &content[offset..])
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted { &value[1..value.len() - 1] } else { value }
}
