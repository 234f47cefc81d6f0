//! Fence recognition and block walking.
//!
//! Article bodies use three fence families: backtick and tilde code fences
//! (CommonMark), and colon fences which only ever open directives. A
//! backtick fence whose info string starts with `{name}` opens a directive
//! instead of a code block, so its bare closing fence must not be mistaken
//! for the start of a code block.
//!
//! [`walk`] splits a document into plain lines, fenced code blocks and
//! directive blocks. Directive blocks close at the first bare fence of the
//! same marker and length that balances the opener, counting same-length
//! openers in between as nesting.

/// A fence line: three or more identical marker characters plus an info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence<'a> {
    /// Marker character: backtick, tilde or colon.
    pub marker: char,
    /// Number of marker characters.
    pub len: usize,
    /// Trimmed text after the marker run.
    pub info: &'a str,
}

impl<'a> Fence<'a> {
    /// Parse a line as a fence.
    ///
    /// Returns `None` for anything shorter than three markers. A backtick
    /// info string may not contain backticks (that is inline code).
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next()?;
        if !matches!(marker, '`' | '~' | ':') {
            return None;
        }

        // Markers are ASCII, so the char count equals the byte count.
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }

        let info = trimmed[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }

        Some(Self { marker, len, info })
    }

    /// A fence with no info string closes a block.
    pub(crate) fn is_closing(&self) -> bool {
        self.info.is_empty()
    }

    /// Same marker and same length: the only fences that nest or close a directive.
    pub(crate) fn same_kind(&self, open: &Fence<'_>) -> bool {
        self.marker == open.marker && self.len == open.len
    }

    /// Directive name and argument when the info string reads `{name} argument`.
    pub(crate) fn directive(&self) -> Option<(&'a str, &'a str)> {
        if self.marker == '~' {
            return None;
        }

        let rest = self.info.strip_prefix('{')?;
        let end = rest.find('}')?;
        let name = rest[..end].trim();
        if !is_valid_directive_name(name) {
            return None;
        }

        Some((name, rest[end + 1..].trim()))
    }
}

/// Check if a name is a valid directive name.
///
/// Valid names contain alphanumerics, hyphens, underscores, dots and colons
/// (the latter for namespaced kinds such as `prf:theorem`).
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Index of the line closing the directive opened at `open_idx`.
///
/// Returns `None` when the block is never closed.
pub(crate) fn find_block_end(lines: &[&str], open_idx: usize, open: &Fence<'_>) -> Option<usize> {
    let mut depth = 1usize;

    for (offset, line) in lines.iter().enumerate().skip(open_idx + 1) {
        let Some(fence) = Fence::parse(line) else {
            continue;
        };
        if !fence.same_kind(open) {
            continue;
        }

        if fence.is_closing() {
            depth -= 1;
            if depth == 0 {
                return Some(offset);
            }
        } else {
            depth += 1;
        }
    }

    None
}

/// Index of the line closing a code fence.
///
/// The closing fence must use the same character, be at least as long as the
/// opening fence, and carry no info string.
fn find_code_end(lines: &[&str], open_idx: usize, open: &Fence<'_>) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(open_idx + 1)
        .find(|(_, line)| {
            Fence::parse(line).is_some_and(|fence| {
                fence.marker == open.marker && fence.len >= open.len && fence.is_closing()
            })
        })
        .map(|(idx, _)| idx)
}

/// A captured directive block, identified by line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectiveBlock<'a> {
    pub name: &'a str,
    pub argument: &'a str,
    pub fence: Fence<'a>,
    /// Index of the opening fence line.
    pub start: usize,
    /// Index of the closing fence line.
    pub end: usize,
}

/// Structural unit produced by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// A line outside any captured block.
    Line(usize),
    /// Fenced code block, inclusive line range (runs to the end when unclosed).
    Code { start: usize, end: usize },
    /// A directive selected by the capture predicate.
    Directive(DirectiveBlock<'a>),
    /// A selected directive opener without a matching closing fence.
    Unclosed { line: usize, name: &'a str },
}

/// Split lines into plain lines, code blocks and captured directives.
///
/// Directives whose name satisfies `capture` are returned whole. Other
/// directives are walked through line by line, so captured blocks nested
/// inside them are still found.
pub(crate) fn walk<'a>(lines: &[&'a str], capture: impl Fn(&str) -> bool) -> Vec<Segment<'a>> {
    let mut segments = Vec::with_capacity(lines.len());
    // Open backtick/colon fences of directives we walk through.
    let mut open_directives: Vec<(char, usize)> = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let Some(fence) = Fence::parse(lines[idx]) else {
            segments.push(Segment::Line(idx));
            idx += 1;
            continue;
        };

        if let Some((name, argument)) = fence.directive() {
            if capture(name) {
                if let Some(end) = find_block_end(lines, idx, &fence) {
                    segments.push(Segment::Directive(DirectiveBlock {
                        name,
                        argument,
                        fence,
                        start: idx,
                        end,
                    }));
                    idx = end + 1;
                } else {
                    segments.push(Segment::Unclosed { line: idx, name });
                    idx += 1;
                }
                continue;
            }

            open_directives.push((fence.marker, fence.len));
            segments.push(Segment::Line(idx));
            idx += 1;
            continue;
        }

        if fence.is_closing() && open_directives.last() == Some(&(fence.marker, fence.len)) {
            open_directives.pop();
            segments.push(Segment::Line(idx));
            idx += 1;
            continue;
        }

        if fence.marker == ':' {
            segments.push(Segment::Line(idx));
            idx += 1;
            continue;
        }

        let end = find_code_end(lines, idx, &fence).unwrap_or(lines.len() - 1);
        segments.push(Segment::Code { start: idx, end });
        idx = end + 1;
    }

    segments
}

/// Byte offsets of each line start, for mapping line ranges to text ranges.
pub(crate) struct LineIndex<'a> {
    pub lines: Vec<&'a str>,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push(offset);
            offset += line.len() + 1;
        }
        Self { lines, starts }
    }

    /// Byte range covering lines `start..=end`, excluding the final newline.
    pub(crate) fn byte_range(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        self.starts[start]..self.starts[end] + self.lines[end].len()
    }
}
