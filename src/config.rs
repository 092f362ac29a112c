use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const BACKEND_URL_ENV: &str = "ADVENTURE_BACKEND_URL";
const DEFAULT_CONFIG: &str = "[backend]\nurl = \"http://localhost:8000\"\n\n[ui]\nskip_boot = false\n";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("HOME is not set")]
    NoHome,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub classify_intent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub skip_boot: bool,
    pub typewriter_ms_per_char: u64,
    /// `0` keeps every submitted command.
    pub history_limit: usize,
    pub theme_file: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            classify_intent: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            skip_boot: false,
            typewriter_ms_per_char: 18,
            history_limit: 0,
            theme_file: "~/.adventure-terminal/theme.toml".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "~/.adventure-terminal/client.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, or the default location when `None`. The default file is
    /// created on first run; an explicit path must already exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        if path.is_none() && !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&config_file, DEFAULT_CONFIG).map_err(|source| ConfigError::Io {
                path: config_file.clone(),
                source,
            })?;
        }
        let text = fs::read_to_string(&config_file).map_err(|source| ConfigError::Io {
            path: config_file.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &config_file)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs.max(1))
    }

    pub fn typewriter_per_char(&self) -> Duration {
        Duration::from_millis(self.ui.typewriter_ms_per_char)
    }

    /// Command-line flag beats the environment, which beats the file.
    pub fn resolve_backend_url(&self, cli_url: Option<&str>, env_url: Option<String>) -> String {
        cli_url
            .map(ToString::to_string)
            .or(env_url.filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| self.backend.url.clone())
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(".adventure-terminal").join("config.toml"))
}

pub fn expand_home(raw_path: &str) -> Result<PathBuf, ConfigError> {
    if raw_path == "~" {
        return home_dir();
    }
    if let Some(rest) = raw_path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw_path))
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(ConfigError::NoHome)
}
