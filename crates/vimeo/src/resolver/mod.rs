//! Content id to manifest URL lookup.

mod models;
mod vimeo;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::utils::capture_group_1;

pub use vimeo::{VimeoEndpoints, VimeoResolver};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?(?:player\.)?vimeo\.com/(?:video/|channels/[^/]+/|showcase/\d+/video/)?(\d+)")
        .unwrap()
});

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)$").unwrap());

/// Accepts a bare numeric id or a vimeo.com / player.vimeo.com URL.
pub fn parse_content_id(input: &str) -> Result<&str, ResolveError> {
    let input = input.trim();
    capture_group_1(&ID_REGEX, input)
        .or_else(|| capture_group_1(&URL_REGEX, input))
        .ok_or_else(|| ResolveError::InvalidContentId(input.to_string()))
}

/// Which delivery format's manifest URL to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    #[default]
    Hls,
    /// The JSON segment manifest consumed by the playlist generator.
    Dash,
}

impl ManifestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::Hls => "hls",
            ManifestKind::Dash => "dash",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hls" => Ok(ManifestKind::Hls),
            "dash" => Ok(ManifestKind::Dash),
            other => Err(format!("unknown manifest kind `{other}`")),
        }
    }
}

#[async_trait]
pub trait ManifestResolver: Send + Sync {
    /// Returns the manifest URL for `content_id`.
    async fn resolve(&self, content_id: &str) -> Result<String, ResolveError>;
}
