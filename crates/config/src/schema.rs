use std::{fmt, path::PathBuf};

use serde::Deserialize;

pub const DEFAULT_STORAGE_PATH: &str = "./storage";
pub const DEFAULT_SCHEMA_SCRIPTS_PATH: &str = "./scripts/schema";
pub const DEFAULT_PORT: u16 = 3000;

/// Fully resolved settings of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub db: DatabaseConfig,
    pub git: GitConfig,
    pub jira: JiraConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Directory holding the database file.
    pub storage_path: PathBuf,
    pub schema_scripts_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            schema_scripts_path: PathBuf::from(DEFAULT_SCHEMA_SCRIPTS_PATH),
        }
    }
}

impl DatabaseConfig {
    pub fn with_storage_path(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfig {
    pub base_url: String,
    pub release_branch_prefix: String,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct JiraConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &password)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// One source of settings (file or command line). Absent values leave the
/// lower priority source untouched when merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub db: DatabaseLayer,
    pub git: GitLayer,
    pub jira: JiraLayer,
    pub service: ServiceLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseLayer {
    pub storage_path: Option<PathBuf>,
    pub schema_scripts_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitLayer {
    pub base_url: Option<String>,
    pub release_branch_prefix: Option<String>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct JiraLayer {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for JiraLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraLayer")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceLayer {
    pub port: Option<u16>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|v| !v.as_os_str().is_empty())
}

impl Config {
    /// Overwrites every value the layer sets. Empty strings and a zero port
    /// count as unset.
    pub fn merge(&mut self, layer: ConfigLayer) {
        self.db.merge(layer.db);
        self.git.merge(layer.git);
        self.jira.merge(layer.jira);
        self.service.merge(layer.service);
    }
}

impl DatabaseConfig {
    fn merge(&mut self, layer: DatabaseLayer) {
        if let Some(path) = non_empty_path(layer.storage_path) {
            self.storage_path = path;
        }
        if let Some(path) = non_empty_path(layer.schema_scripts_path) {
            self.schema_scripts_path = path;
        }
    }
}

impl GitConfig {
    fn merge(&mut self, layer: GitLayer) {
        if let Some(url) = non_empty(layer.base_url) {
            self.base_url = url;
        }
        if let Some(prefix) = non_empty(layer.release_branch_prefix) {
            self.release_branch_prefix = prefix;
        }
    }
}

impl JiraConfig {
    fn merge(&mut self, layer: JiraLayer) {
        if let Some(url) = non_empty(layer.base_url) {
            self.base_url = url;
        }
        if let Some(username) = non_empty(layer.username) {
            self.username = username;
        }
        if let Some(password) = non_empty(layer.password) {
            self.password = password;
        }
    }
}

impl ServiceConfig {
    fn merge(&mut self, layer: ServiceLayer) {
        if let Some(port) = layer.port.filter(|port| *port != 0) {
            self.port = port;
        }
    }
}
