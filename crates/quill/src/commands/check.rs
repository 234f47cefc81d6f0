//! `quill check` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use quill_renderer::ArticleRenderer;

use super::{ConfigArgs, identity_for, read_article, render_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Articles to check (default: every `{category}/{slug}/*.md` under the
    /// source directory).
    files: Vec<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if any article cannot be read or produced warnings.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let renderer = ArticleRenderer::new(render_options(&config)?);

        let files = if self.files.is_empty() {
            output.source_dir(&config.content_resolved.source_dir);
            find_articles(&config.content_resolved.source_dir)?
        } else {
            self.files
        };

        let mut warned_files = 0;
        let mut total_warnings = 0;
        for file in &files {
            let identity = identity_for(file, None, None)?;
            let post = renderer.render(&read_article(file)?, &identity);
            tracing::info!(
                file = %file.display(),
                warnings = post.warnings.len(),
                "Checked article"
            );

            if post.warnings.is_empty() {
                continue;
            }
            warned_files += 1;
            total_warnings += post.warnings.len();
            output.article_warnings(file, &post.warnings);
        }

        if total_warnings > 0 {
            return Err(CliError::Validation(format!(
                "{total_warnings} warning(s) in {warned_files} of {} article(s)",
                files.len()
            )));
        }

        output.all_clean(files.len());
        Ok(())
    }
}

/// Markdown files two directory levels below `source_dir`, sorted.
fn find_articles(source_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut articles = Vec::new();
    for category in subdirectories(source_dir)? {
        for slug in subdirectories(&category)? {
            for entry in std::fs::read_dir(&slug)? {
                let path = entry?.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                    articles.push(path);
                }
            }
        }
    }
    articles.sort();
    Ok(articles)
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}
