//! Configuration management for Quill.
//!
//! Parses `quill.toml` with serde and discovers it in the current directory
//! or any parent. Values are layered: file, then environment, then
//! [`CliSettings`].
//!
//! ```toml
//! [content]
//! source_dir = "blogs"
//!
//! [paths]
//! local = false
//! external_base = "https://raw.example.com/${BLOG_BRANCH:-main}"
//!
//! [render]
//! max_directive_depth = 32
//! wrap_tables = true
//! ```
//!
//! ## Environment
//!
//! - `QUILL_LOCAL` (`1/true/yes/on` or `0/false/no/off`) overrides `paths.local`.
//! - `${VAR}` and `${VAR:-default}` are expanded in `content.source_dir` and
//!   `paths.external_base`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Environment variable overriding `paths.local`.
pub const LOCAL_ENV_VAR: &str = "QUILL_LOCAL";

const DEFAULT_SOURCE_DIR: &str = "blogs";
const DEFAULT_MAX_DIRECTIVE_DEPTH: usize = 32;

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override article source directory.
    pub source_dir: Option<PathBuf>,
    /// `--local` / `--published`.
    pub local: Option<bool>,
    /// Override the published base URL.
    pub external_base: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content section as written in TOML.
    content: ContentConfigRaw,
    /// Where media URLs point.
    pub paths: PathsConfig,
    /// Pipeline settings.
    pub render: RenderConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding `{category}/{slug}/` article folders.
    pub source_dir: PathBuf,
}

/// Media path configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Serve media from the local site (`/blogs/...`).
    pub local: bool,
    /// Raw-content base URL used when not local.
    pub external_base: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            local: true,
            external_base: None,
        }
    }
}

impl PathsConfig {
    /// Base URL for published mode, or `None` in local mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` in published mode without a valid
    /// `external_base`.
    pub fn published_base(&self) -> Result<Option<&str>, ConfigError> {
        if self.local {
            return Ok(None);
        }
        let base = self.external_base.as_deref().unwrap_or_default();
        require_non_empty(base, "paths.external_base")?;
        require_http_url(base, "paths.external_base")?;
        Ok(Some(base.trim_end_matches('/')))
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directives nested deeper than this stay literal.
    pub max_directive_depth: usize,
    /// Wrap tables in a scrollable container.
    pub wrap_tables: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_directive_depth: DEFAULT_MAX_DIRECTIVE_DEPTH,
            wrap_tables: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`paths.external_base`").
        field: String,
        /// Error message (e.g., "${`BLOG_BRANCH`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Parse a boolean environment value.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `quill.toml` in the current directory and its parents, falling back
    /// to defaults. `QUILL_LOCAL` and then CLI settings are applied on top,
    /// and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Search for `quill.toml` in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply environment overrides, reading variables through `lookup`.
    fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(LOCAL_ENV_VAR) {
            self.paths.local = parse_flag(&value).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "{LOCAL_ENV_VAR} must be one of 1/true/yes/on or 0/false/no/off, got '{value}'"
                ))
            })?;
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(local) = settings.local {
            self.paths.local = local;
        }
        if let Some(external_base) = &settings.external_base {
            self.paths.external_base = Some(external_base.clone());
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.paths.published_base()?;
        if self.render.max_directive_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_directive_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            paths: PathsConfig::default(),
            render: RenderConfig::default(),
            content_resolved: ContentConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.content.source_dir {
            self.content.source_dir = Some(expand::expand_env(dir, "content.source_dir")?);
        }
        if let Some(ref base) = self.paths.external_base {
            self.paths.external_base = Some(expand::expand_env(base, "paths.external_base")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = self.content.source_dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR);
        self.content_resolved = ContentConfig {
            source_dir: config_dir.join(source_dir),
        };
    }
}
