use std::path::{Path, PathBuf};

use thiserror::Error;

mod schema;

pub use schema::{
    Config, ConfigLayer, DEFAULT_PORT, DEFAULT_SCHEMA_SCRIPTS_PATH, DEFAULT_STORAGE_PATH,
    DatabaseConfig, DatabaseLayer, GitConfig, GitLayer, JiraConfig, JiraLayer, ServiceConfig,
    ServiceLayer,
};

pub const DEFAULT_CONFIG_FILE: &str = "./etc/config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("content of configuration file is not in JSON format: {0}")]
    NotJson(#[from] serde_json::Error),
}

/// Reads a single settings layer from a JSON file.
pub fn load_layer_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Builds the effective configuration: defaults, then the file, then the
/// command line flags.
///
/// Without an explicit `config_file` the default location is tried and a
/// missing file there just means "use defaults". An explicitly named file
/// must exist.
pub fn resolve(config_file: Option<&Path>, flags: ConfigLayer) -> Result<Config, ConfigError> {
    resolve_with_default(Path::new(DEFAULT_CONFIG_FILE), config_file, flags)
}

/// Same as [`resolve`] with the fallback file location given by the caller.
pub fn resolve_with_default(
    default_file: &Path,
    config_file: Option<&Path>,
    flags: ConfigLayer,
) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    let file_layer = match config_file {
        Some(path) => load_layer_from_file(path)?,
        None => match load_layer_from_file(default_file) {
            Ok(layer) => layer,
            Err(ConfigError::FileNotFound(path)) => {
                tracing::info!("No config file at {}, using defaults", path.display());
                ConfigLayer::default()
            }
            Err(err) => return Err(err),
        },
    };

    config.merge(file_layer);
    config.merge(flags);
    Ok(config)
}
