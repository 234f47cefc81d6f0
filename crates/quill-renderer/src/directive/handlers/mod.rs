//! Built-in directive handlers.

mod admonition;
mod code;
mod glossary;
mod layout;
mod media;
mod proof;
mod tabs;

pub use admonition::{Admonition, Dropdown};
pub use code::{Code, Mermaid};
pub use glossary::Glossary;
pub use layout::{Card, Grid, GridItem, GridItemCard};
pub use media::{Iframe, Video, VideoCompare};
pub use proof::{Exercise, Proof, Solution};
pub use tabs::{TabItemDirective, TabSet};

use super::DirectiveEngine;

/// Render a title argument as inline HTML, roles included.
pub(crate) fn inline_title(text: &str) -> String {
    crate::markdown::render_inline(&crate::role::resolve(text))
}

impl DirectiveEngine {
    /// Register every built-in directive.
    ///
    /// Handlers registered afterwards with the same name replace the
    /// built-in one.
    #[must_use]
    pub fn with_builtin_directives(self) -> Self {
        let mut engine = self;
        for &kind in admonition::ADMONITION_KINDS {
            engine = engine.with_directive(Admonition::new(kind));
        }
        for &(name, display) in proof::PROOF_KINDS {
            engine = engine.with_directive(Proof::new(name, display));
        }
        for name in ["code", "code-block", "sourcecode"] {
            engine = engine.with_directive(Code::new(name));
        }

        engine
            .with_directive(Dropdown)
            .with_directive(Card)
            .with_directive(Grid)
            .with_directive(GridItem)
            .with_directive(GridItemCard)
            .with_directive(TabSet)
            .with_directive(TabItemDirective)
            .with_directive(Exercise)
            .with_directive(Solution)
            .with_directive(Iframe)
            .with_directive(Video)
            .with_directive(VideoCompare)
            .with_directive(Mermaid)
            .with_directive(Glossary)
    }
}
