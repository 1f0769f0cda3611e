//! Layered configuration.
//!
//! Sources are merged over the built-in defaults, lowest precedence first:
//!
//! 1. user config: `config.<ext>` in the platform config dir
//!    (`~/.config/relnotes/` on Linux)
//! 2. project config: the nearest `.relnotes.<ext>` or `relnotes.<ext>`,
//!    searching upward from the working directory and stopping at the
//!    directory that holds `.git`
//! 3. files passed explicitly, in order
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`, tried in that order; within one
//! extension the dotfile wins.
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use relnotes_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::from("/src/my-game");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! let options = config.render_options();
//! assert!(options.indent_width > 0);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::render::{InvalidDatePolicy, RenderOptions};

/// The configuration for relnotes.
///
/// Deserialized from config files found during discovery (TOML, YAML, or JSON).
/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// XML layout overrides.
    pub render: Option<RenderConfig>,
}

impl Config {
    /// Render options with config overrides applied over the defaults.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        let Some(ref render) = self.render else {
            return defaults;
        };
        RenderOptions {
            indent_width: render.indent_width.unwrap_or(defaults.indent_width),
            base_level: render.base_level.unwrap_or(defaults.base_level),
            invalid_date: render.invalid_date.unwrap_or(defaults.invalid_date),
        }
    }
}

/// The `[render]` section.
///
/// # Example
///
/// ```toml
/// [render]
/// # Pre-indent the block for pasting inside <component>.
/// base_level = 1
/// invalid_date = "error"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RenderConfig {
    /// Spaces per nesting level (default: 2).
    pub indent_width: Option<usize>,
    /// Nesting level of the root `<releases>` element (default: 0).
    pub base_level: Option<usize>,
    /// `"sentinel"` writes `0000-00-00` for unparseable dates, `"error"` aborts.
    pub invalid_date: Option<InvalidDatePolicy>,
}

/// Default log filter when neither `-q`/`-v` nor `RUST_LOG` is given.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Parser decisions per heading.
    Debug,
    /// One summary line per conversion.
    #[default]
    Info,
    /// Only suspicious input, such as undated releases.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name, usable as an `EnvFilter` directive.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Entry marking a repository root; project search does not go above it.
const REPO_MARKER: &str = ".git";

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "relnotes";

/// Where a config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `~/.config/relnotes/config.<ext>`.
    User,
    /// `.relnotes.<ext>` or `relnotes.<ext>` above the search root.
    Project,
    /// Passed with `--config` or [`ConfigLoader::with_file`].
    Explicit,
}

/// A config file that takes part in loading, lowest precedence first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSource {
    /// Path of the file.
    pub path: Utf8PathBuf,
    /// How it was discovered.
    pub kind: SourceKind,
}

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    /// Stop the upward search at the directory holding [`REPO_MARKER`].
    stop_at_repo_root: bool,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader that reads user config and stops at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            stop_at_repo_root: true,
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for a project config file.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/relnotes/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Search all the way to the filesystem root.
    pub const fn without_repo_boundary(mut self) -> Self {
        self.stop_at_repo_root = false;
        self
    }

    /// Add an explicit config file. Later files take precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// The files [`load`](Self::load) would merge, lowest precedence first.
    pub fn sources(&self) -> Vec<ConfigSource> {
        let user = self
            .include_user_config
            .then(find_user_config)
            .flatten()
            .map(|path| ConfigSource {
                path,
                kind: SourceKind::User,
            });
        let project = self
            .project_search_root
            .as_deref()
            .and_then(|root| self.find_project_config(root))
            .map(|path| ConfigSource {
                path,
                kind: SourceKind::Project,
            });
        let explicit = self.explicit_files.iter().map(|path| ConfigSource {
            path: path.clone(),
            kind: SourceKind::Explicit,
        });

        user.into_iter().chain(project).chain(explicit).collect()
    }

    /// Load configuration, merging all discovered sources over the defaults.
    ///
    /// Precedence (highest to lowest): explicit files in the order added,
    /// project config, user config, defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Deserialize`] if a file cannot be parsed or holds
    /// values of the wrong shape.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<Config> {
        let sources = self.sources();
        tracing::debug!(sources = sources.len(), "loading configuration");

        let figment = sources.iter().fold(
            Figment::new().merge(Serialized::defaults(Config::default())),
            |figment, source| merge_file(figment, &source.path),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn find_project_config(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        for dir in start.ancestors() {
            // Dotfile wins over the plain name for the same extension.
            let found = CONFIG_EXTENSIONS.iter().find_map(|ext| {
                [format!(".{APP_NAME}.{ext}"), format!("{APP_NAME}.{ext}")]
                    .into_iter()
                    .map(|name| dir.join(name))
                    .find(|path| path.is_file())
            });
            if found.is_some() {
                return found;
            }

            if self.stop_at_repo_root && dir.join(REPO_MARKER).exists() {
                break;
            }
        }

        None
    }
}

fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge a config file into the figment, detecting format from extension.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// Find the project config file [`ConfigLoader::load`] would pick up from
/// `start`, without loading it.
pub fn find_project_config<P: AsRef<Utf8Path>>(start: P) -> Option<Utf8PathBuf> {
    ConfigLoader::new().find_project_config(start.as_ref())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/relnotes/` on Linux, `~/Library/Application Support/relnotes/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// Get the local data directory path (machine-specific, not synced).
///
/// Returns `~/.local/share/relnotes/` on Linux, `~/Library/Application Support/relnotes/`
/// on macOS, and equivalent on other platforms.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}
