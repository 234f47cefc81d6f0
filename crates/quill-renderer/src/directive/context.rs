//! Directive rendering context.
//!
//! State shared by directive handlers during one render: numbering
//! counters, exercise labels and the tab items collected for the
//! innermost open `tab-set`.

use std::collections::HashMap;

/// A tab collected from a `tab-item` for its enclosing `tab-set`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabItem {
    /// Unique ID within the document.
    pub id: usize,
    /// Button label (rendered HTML).
    pub label: String,
    /// Whether the item asked to be selected initially.
    pub selected: bool,
    /// Panel markdown.
    pub body: String,
    /// Extra classes from `:class:`, with a leading space.
    pub classes: String,
}

/// Render-scoped state for directive handlers.
///
/// # Example
///
/// ```
/// use quill_renderer::directive::DirectiveContext;
///
/// let mut ctx = DirectiveContext::new();
/// assert_eq!(ctx.next_number("prf:theorem"), 1);
/// assert_eq!(ctx.next_number("prf:theorem"), 2);
/// assert_eq!(ctx.next_number("prf:lemma"), 1);
/// ```
#[derive(Debug, Default)]
pub struct DirectiveContext {
    counters: HashMap<String, usize>,
    exercises: HashMap<String, usize>,
    tab_frames: Vec<Vec<TabItem>>,
    next_tab_set: usize,
    next_tab: usize,
    warnings: Vec<String>,
}

impl DirectiveContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next number for a numbered directive kind, starting at 1.
    pub fn next_number(&mut self, kind: &str) -> usize {
        let counter = self.counters.entry(kind.to_owned()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Remember the number of a labeled exercise.
    pub fn register_exercise(&mut self, label: &str, number: usize) {
        self.exercises.insert(label.to_owned(), number);
    }

    /// Number of a labeled exercise.
    #[must_use]
    pub fn exercise_number(&self, label: &str) -> Option<usize> {
        self.exercises.get(label).copied()
    }

    /// Open a frame collecting tab items.
    pub fn open_tab_set(&mut self) {
        self.tab_frames.push(Vec::new());
    }

    /// Close the innermost frame, returning its id and items.
    pub fn close_tab_set(&mut self) -> (usize, Vec<TabItem>) {
        let id = self.next_tab_set;
        self.next_tab_set += 1;
        (id, self.tab_frames.pop().unwrap_or_default())
    }

    /// Add a tab to the innermost frame.
    ///
    /// Returns the item back when no `tab-set` is open.
    pub fn push_tab(&mut self, mut item: TabItem) -> Result<(), TabItem> {
        item.id = self.next_tab;
        let Some(frame) = self.tab_frames.last_mut() else {
            return Err(item);
        };
        self.next_tab += 1;
        frame.push(item);
        Ok(())
    }

    /// Record a recovered problem.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
