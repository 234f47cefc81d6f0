//! `quill render` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::Term;
use quill_renderer::render_article;

use super::{ConfigArgs, identity_for, read_article, render_options};
use crate::error::CliError;
use crate::output::Output;

/// Output format for rendered articles.
#[derive(Clone, Copy, Default, ValueEnum)]
pub(crate) enum Format {
    /// Rendered HTML body only.
    #[default]
    Html,
    /// The full rendered post with metadata, TOC and warnings.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown article to render.
    file: PathBuf,

    /// Article category (default: the file's grandparent directory).
    #[arg(long)]
    category: Option<String>,

    /// Article slug (default: the file's parent directory).
    #[arg(long)]
    slug: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the article cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let options = render_options(&config)?;

        let identity = identity_for(&self.file, self.category, self.slug)?;
        let raw = read_article(&self.file)?;
        let post = render_article(&raw, &identity, &options);

        output.article_warnings(&self.file, &post.warnings);

        let rendered = match self.format {
            Format::Html => post.content,
            Format::Json => serde_json::to_string_pretty(&post)?,
        };
        Term::stdout().write_line(rendered.trim_end())?;
        Ok(())
    }
}
