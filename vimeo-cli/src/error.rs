use std::path::PathBuf;

use thiserror::Error;
use vimeo_hls::{GeneratorError, ResolveError};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("failed to resolve manifest: {0}")]
    Resolve(#[from] ResolveError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("no config directory available on this platform, pass --config")]
    NoConfigDir,
}
