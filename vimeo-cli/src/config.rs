use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vimeo_hls::{ClientConfig, DEFAULT_GENERATOR_COMMENT, DEFAULT_UA, ManifestKind};

use crate::error::{CliError, Result};

const CONFIG_DIR: &str = "vimeo-dl";
const CONFIG_FILE: &str = "config.toml";

/// Settings read from `config.toml`. Every key is optional in the file;
/// command line flags take precedence over these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where playlists are written when `--output` is not given
    pub output_dir: PathBuf,

    /// Request timeout in seconds, 0 disables it
    pub timeout: u64,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    pub user_agent: String,

    /// Comment line written into every playlist
    pub comment: String,

    /// Manifest kind printed by `resolve` when `--kind` is not given
    pub manifest_kind: ManifestKind,

    pub colored_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            timeout: 30,
            connect_timeout: 30,
            user_agent: DEFAULT_UA.to_string(),
            comment: DEFAULT_GENERATOR_COMMENT.to_string(),
            manifest_kind: ManifestKind::Hls,
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Default location: `<config dir>/vimeo-dl/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_path(path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config =
            toml::from_str(&content).map_err(|source| CliError::ConfigParse { path, source })?;
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = Self::resolve_path(path).ok_or(CliError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Overwrites the configuration file with the defaults.
    pub fn reset(path: Option<&Path>) -> Result<PathBuf> {
        Self::default().save(path)
    }

    pub fn show(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// HTTP client settings, with `timeout_override` taking precedence.
    pub fn client_config(&self, timeout_override: Option<u64>) -> ClientConfig {
        let timeout = timeout_override.unwrap_or(self.timeout);
        ClientConfig {
            user_agent: self.user_agent.clone(),
            timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }
}
