//! Terminal reporting for the CLI.
//!
//! Everything goes to stderr; stdout carries only rendered articles.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    path: Style,
    warning: Style,
    ok: Style,
    failure: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            path: Style::new().cyan().bold(),
            warning: Style::new().yellow(),
            ok: Style::new().green(),
            failure: Style::new().red(),
        }
    }

    /// Announce the directory `quill check` scans.
    pub(crate) fn source_dir(&self, dir: &Path) {
        let _ = self.term.write_line(&format!("Source: {}", dir.display()));
    }

    /// Article path followed by its render warnings, one per line.
    ///
    /// Prints nothing for a clean article.
    pub(crate) fn article_warnings(&self, file: &Path, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let header = self.path.apply_to(file.display()).to_string();
        let _ = self.term.write_line(&header);
        for warning in warnings {
            let line = self.warning.apply_to(format!("  {warning}")).to_string();
            let _ = self.term.write_line(&line);
        }
    }

    pub(crate) fn all_clean(&self, articles: usize) {
        let line = format!("{articles} article(s) rendered cleanly");
        let _ = self.term.write_line(&self.ok.apply_to(line).to_string());
    }

    pub(crate) fn error(&self, err: &dyn Display) {
        let line = format!("Error: {err}");
        let _ = self.term.write_line(&self.failure.apply_to(line).to_string());
    }
}
