//! Render-scoped state.

use crate::directive::DirectiveContext;
use crate::figure::FigureTargets;
use crate::math::EquationRegistry;

/// Everything one render accumulates.
///
/// A fresh context is created for every article, so concurrent renders
/// never share numbering or target tables.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Labeled equations, numbered in document order.
    pub equations: EquationRegistry,
    /// Named figure targets.
    pub figures: FigureTargets,
    /// Directive counters, exercise labels and open tab sets.
    pub directives: DirectiveContext,
    pub(crate) warnings: Vec<String>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All warnings, pipeline stages first, then directives.
    pub fn take_warnings(&mut self) -> Vec<String> {
        let mut warnings = std::mem::take(&mut self.warnings);
        warnings.extend(self.directives.take_warnings());
        warnings
    }
}
