use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JwtResponse {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponse {
    pub config_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    pub request: Option<PlayerRequest>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerRequest {
    pub files: Option<PlayerFiles>,
}

/// Delivery formats offered by the player config. `progressive` and
/// friends are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerFiles {
    pub hls: Option<FilesEntry>,
    pub dash: Option<FilesEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FilesEntry {
    pub default_cdn: Option<String>,
    #[serde(default)]
    pub cdns: HashMap<String, CdnEntry>,
}

impl FilesEntry {
    /// URL served by the default CDN.
    pub fn default_url(&self) -> Option<&str> {
        let cdn = self.default_cdn.as_deref()?;
        self.cdns.get(cdn)?.url.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct CdnEntry {
    pub url: Option<String>,
}
