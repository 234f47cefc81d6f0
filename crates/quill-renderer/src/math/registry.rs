//! Equation label registry.

use std::collections::{HashMap, HashSet};

/// A numbered equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    /// Display number, starting at 1.
    pub number: usize,
    /// Anchor id of the equation block.
    pub id: String,
}

/// Error returned when a label was already used by an earlier equation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate equation label '{0}'")]
pub struct DuplicateLabel(pub String);

/// Label to number mapping for one render.
///
/// Numbers are assigned in registration order, so equations must be
/// registered in document order. Labeled equations that are not enumerated
/// only reserve their anchor.
#[derive(Debug, Default)]
pub struct EquationRegistry {
    numbered: HashMap<String, Equation>,
    anchors: HashSet<String>,
}

impl EquationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next number to `label`.
    pub fn number(&mut self, label: &str) -> Result<&Equation, DuplicateLabel> {
        self.reserve(label)?;
        let equation = Equation {
            number: self.numbered.len() + 1,
            id: label.to_owned(),
        };
        Ok(self.numbered.entry(label.to_owned()).or_insert(equation))
    }

    /// Reserve the anchor of a labeled but unnumbered equation.
    pub fn reserve(&mut self, label: &str) -> Result<(), DuplicateLabel> {
        if self.anchors.insert(label.to_owned()) {
            Ok(())
        } else {
            Err(DuplicateLabel(label.to_owned()))
        }
    }

    /// Look up a numbered equation.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Equation> {
        self.numbered.get(label)
    }

    /// Number of numbered equations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.numbered.len()
    }

    /// Check if no equation has been numbered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbered.is_empty()
    }
}
