//! Configuration file handling for tablescope.
//!
//! Looks for `.config/tablescope.styx` in the current directory or any
//! parent directory:
//!
//! ```styx
//! introspect {
//!     discriminator_column sys_class_name
//! }
//! catalog {
//!     path "catalog.json"
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use facet::Facet;
use thiserror::Error;

/// Location of the config file, relative to a project directory.
pub const CONFIG_PATH: &str = ".config/tablescope.styx";

/// Configuration loaded from `tablescope.styx`.
#[derive(Debug, Clone, Default, Facet)]
pub struct Config {
    /// How columns are classified.
    #[facet(default)]
    pub introspect: IntrospectConfig,

    /// Where table definitions come from.
    #[facet(default)]
    pub catalog: CatalogConfig,
}

/// Column classification settings.
#[derive(Debug, Clone, Default, Facet)]
pub struct IntrospectConfig {
    /// Name of the class-indicator column (default: `sys_class_name`).
    #[facet(default)]
    pub discriminator_column: Option<String>,

    /// Match the class-indicator column by type tag instead of by name.
    /// Takes precedence over `discriminator_column`.
    #[facet(default)]
    pub discriminator_type: Option<String>,
}

/// Catalog source settings.
#[derive(Debug, Clone, Default, Facet)]
pub struct CatalogConfig {
    /// Path to a JSON catalog, relative to the directory holding `.config/`.
    #[facet(default)]
    pub path: Option<String>,
}

/// A parsed config file and the project directory it applies to.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// Directory containing `.config/tablescope.styx`
    pub root: Utf8PathBuf,
}

impl LoadedConfig {
    /// Catalog path from the config, resolved against the project directory.
    pub fn catalog_path(&self) -> Option<Utf8PathBuf> {
        self.config
            .catalog
            .path
            .as_deref()
            .map(|path| self.root.join(path))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No {CONFIG_PATH} found in current directory or any parent")]
    NotFound,

    #[error("Failed to read {path}: {message}")]
    Io { path: Utf8PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },
}

/// Load configuration, searching up from the current directory.
pub fn load() -> Result<LoadedConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: Utf8PathBuf::from("."),
        message: e.to_string(),
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| ConfigError::Io {
        path: Utf8PathBuf::from("."),
        message: format!("working directory {} is not UTF-8", p.display()),
    })?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Utf8Path) -> Result<LoadedConfig, ConfigError> {
    let config_path = find_config_file(start)?;
    let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
        path: config_path.clone(),
        message: e.to_string(),
    })?;

    let config = parse(&content).map_err(|message| ConfigError::Parse {
        path: config_path.clone(),
        message,
    })?;

    // `<root>/.config/tablescope.styx`
    let root = config_path
        .parent()
        .and_then(Utf8Path::parent)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf());

    Ok(LoadedConfig { config, root })
}

/// Parse config file contents.
pub fn parse(content: &str) -> Result<Config, String> {
    facet_styx::from_str(content).map_err(|e| e.to_string())
}

/// Find `.config/tablescope.styx` by searching up the directory tree.
fn find_config_file(start: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_PATH);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}
