use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_DATABASE_PATH: &str = "RECIPEBOX_DATABASE_PATH";
pub const ENV_LISTEN_ADDR: &str = "RECIPEBOX_LISTEN_ADDR";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .path.display(), .err)]
    Read {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {}", .path.display(), .err)]
    Parse {
        path: PathBuf,
        #[source]
        err: serde_yaml::Error,
    },

    #[error("Invalid listen address '{value}' from {source_kind}: expected host:port")]
    ListenAddr {
        value: String,
        source_kind: ConfigSource,
    },
}

/// Where the store lives and where the server listens.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub database_path: ConfigValue<PathBuf>,
    pub listen_addr: ConfigValue<SocketAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    listen_addr: Option<String>,
}

impl Config {
    /// Loads `config_path` (or the default path) and applies `RECIPEBOX_*`
    /// overrides from the process environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Priority: environment, then config file, then defaults. A missing
    /// config file is not an error.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        let file = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|err| ConfigError::Read {
                path: path.clone(),
                err,
            })?;
            let parsed: ConfigFile =
                serde_yaml::from_str(&contents).map_err(|err| ConfigError::Parse {
                    path: path.clone(),
                    err,
                })?;
            Some((path, parsed))
        } else {
            None
        };

        let mut database_path = ConfigValue::new(
            Self::default_data_dir().join("recipebox.db"),
            ConfigSource::Default,
        );
        let mut listen_addr = (DEFAULT_LISTEN_ADDR.to_string(), ConfigSource::Default);

        if let Some((path, parsed)) = &file {
            if let Some(db_path) = &parsed.database_path {
                database_path =
                    ConfigValue::new(relative_to(path, db_path), ConfigSource::File);
            }
            if let Some(addr) = &parsed.listen_addr {
                listen_addr = (addr.clone(), ConfigSource::File);
            }
        }

        if let Some(db_path) = env(ENV_DATABASE_PATH) {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Some(addr) = env(ENV_LISTEN_ADDR) {
            listen_addr = (addr, ConfigSource::Environment);
        }

        let (addr, source) = listen_addr;
        let parsed_addr = addr.trim().parse().map_err(|_| ConfigError::ListenAddr {
            value: addr.clone(),
            source_kind: source,
        })?;

        Ok(Self {
            database_path,
            listen_addr: ConfigValue::new(parsed_addr, source),
            config_file: file.map(|(path, _)| path),
        })
    }

    /// `(key, value, source)` rows in display order.
    pub fn entries(&self) -> Vec<(&'static str, String, ConfigSource)> {
        vec![
            (
                "database_path",
                self.database_path.value.display().to_string(),
                self.database_path.source,
            ),
            (
                "listen_addr",
                self.listen_addr.value.to_string(),
                self.listen_addr.source,
            ),
        ]
    }

    /// `<config_dir>/recipebox/config.yaml`, e.g. ~/.config/recipebox/config.yaml on Linux.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebox")
            .join("config.yaml")
    }

    /// `<data_dir>/recipebox`, e.g. ~/.local/share/recipebox on Linux.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebox")
    }
}

/// Database paths in a config file are relative to that file's directory.
fn relative_to(config_file: &Path, db_path: &Path) -> PathBuf {
    match config_file.parent() {
        Some(dir) if db_path.is_relative() => dir.join(db_path),
        _ => db_path.to_path_buf(),
    }
}
