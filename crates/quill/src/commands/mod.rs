//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

use std::path::{Path, PathBuf};

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_renderer::{ArticleIdentity, PathMode, RenderOptions};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Configuration flags shared by every command.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Point media paths at the local site.
    #[arg(long, conflicts_with = "published")]
    local: bool,

    /// Point media paths at the external base URL.
    #[arg(long)]
    published: bool,

    /// Published base URL (overrides config).
    #[arg(long)]
    external_base: Option<String>,

    /// Article source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ConfigArgs {
    fn cli_settings(&self) -> CliSettings {
        let local = if self.local {
            Some(true)
        } else if self.published {
            Some(false)
        } else {
            None
        };
        CliSettings {
            source_dir: self.source_dir.clone(),
            local,
            external_base: self.external_base.clone(),
        }
    }

    pub(crate) fn load(&self) -> Result<Config, CliError> {
        Ok(Config::load(self.config.as_deref(), Some(&self.cli_settings()))?)
    }
}

/// Build renderer options from a loaded configuration.
pub(crate) fn render_options(config: &Config) -> Result<RenderOptions, CliError> {
    let path_mode = match config.paths.published_base()? {
        Some(base) => PathMode::Published {
            base_url: base.to_owned(),
        },
        None => PathMode::Local,
    };
    Ok(RenderOptions::default()
        .with_path_mode(path_mode)
        .with_max_directive_depth(config.render.max_directive_depth)
        .with_wrap_tables(config.render.wrap_tables))
}

pub(crate) fn read_article(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Article identity for `path`, laid out as `{category}/{slug}/FILE`.
///
/// Explicit values win over the directory names.
pub(crate) fn identity_for(
    path: &Path,
    category: Option<String>,
    slug: Option<String>,
) -> Result<ArticleIdentity, CliError> {
    let absolute = std::path::absolute(path)?;
    let parent = absolute.parent();
    let dir_name = |dir: Option<&Path>| {
        dir.and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    };

    let slug = slug.or_else(|| dir_name(parent));
    let category = category.or_else(|| dir_name(parent.and_then(Path::parent)));

    match (category, slug) {
        (Some(category), Some(slug)) => Ok(ArticleIdentity::new(category, slug)),
        _ => Err(CliError::Validation(format!(
            "Cannot infer category and slug from {}, pass --category and --slug",
            path.display()
        ))),
    }
}
