use std::path::PathBuf;

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Failures of the manifest-to-playlist pipeline.
///
/// None of these are retried; every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("manifest request returned HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("manifest is not valid JSON: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("manifest has no video or audio renditions")]
    EmptyManifest,

    #[error("invalid init segment for {rendition}: {reason}")]
    Decode { rendition: String, reason: String },

    #[error("invalid URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("file name `{name}` would be written outside the output directory")]
    UnsafeFileName { name: String },

    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    pub fn http_status(status: StatusCode, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    pub fn decode(rendition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            rendition: rendition.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn unsafe_file_name(name: impl Into<String>) -> Self {
        Self::UnsafeFileName { name: name.into() }
    }

    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure happened before or during the manifest download.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }
}

/// Failures of the content id to manifest URL lookup.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{step} returned HTTP {status}")]
    HttpStatus {
        step: &'static str,
        status: StatusCode,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{field}` in {step} response")]
    MissingField {
        step: &'static str,
        field: String,
    },
}

impl ResolveError {
    pub fn missing_field(step: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            step,
            field: field.into(),
        }
    }
}
