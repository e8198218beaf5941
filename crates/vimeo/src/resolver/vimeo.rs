use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::models::{JwtResponse, PlayerConfig, VideoResponse};
use super::{ManifestKind, ManifestResolver, parse_content_id};
use crate::error::ResolveError;

const JWT_STEP: &str = "JWT API";
const VIDEO_STEP: &str = "Video API";
const CONFIG_STEP: &str = "Config API";

#[derive(Debug, Clone)]
pub struct VimeoEndpoints {
    /// Anonymous token endpoint, e.g. `https://vimeo.com/_rv/jwt`.
    pub jwt_url: String,
    /// API root; `/videos/{id}` is appended.
    pub api_base: String,
}

impl Default for VimeoEndpoints {
    fn default() -> Self {
        Self {
            jwt_url: "https://vimeo.com/_rv/jwt".to_owned(),
            api_base: "https://api.vimeo.com".to_owned(),
        }
    }
}

/// Resolves a Vimeo video id with three sequential calls:
/// anonymous JWT, the video's `config_url`, then the player config whose
/// default CDN entry holds the manifest URL.
#[derive(Debug, Clone)]
pub struct VimeoResolver {
    client: Client,
    endpoints: VimeoEndpoints,
    kind: ManifestKind,
}

impl VimeoResolver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoints: VimeoEndpoints::default(),
            kind: ManifestKind::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: VimeoEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_kind(mut self, kind: ManifestKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    async fn read_json<T: DeserializeOwned>(
        step: &'static str,
        response: Response,
    ) -> Result<T, ResolveError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ResolveError::HttpStatus { step, status });
        }
        let body = response.text().await?;
        debug!(step, bytes = body.len(), "Received response");
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_token(&self) -> Result<String, ResolveError> {
        let response = self
            .client
            .post(&self.endpoints.jwt_url)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;
        let jwt: JwtResponse = Self::read_json(JWT_STEP, response).await?;
        jwt.token
            .ok_or_else(|| ResolveError::missing_field(JWT_STEP, "token"))
    }

    async fn fetch_config_url(&self, video_id: &str, token: &str) -> Result<String, ResolveError> {
        let url = format!(
            "{}/videos/{}",
            self.endpoints.api_base.trim_end_matches('/'),
            video_id
        );
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("jwt {token}"))
            .header(ACCEPT, "application/json")
            .query(&[("fields", "config_url")])
            .send()
            .await?;
        let video: VideoResponse = Self::read_json(VIDEO_STEP, response).await?;
        video
            .config_url
            .ok_or_else(|| ResolveError::missing_field(VIDEO_STEP, "config_url"))
    }

    async fn fetch_manifest_url(&self, config_url: &str) -> Result<String, ResolveError> {
        let response = self.client.get(config_url).send().await?;
        let config: PlayerConfig = Self::read_json(CONFIG_STEP, response).await?;

        let files = config
            .request
            .and_then(|r| r.files)
            .ok_or_else(|| ResolveError::missing_field(CONFIG_STEP, "request.files"))?;
        let entry = match self.kind {
            ManifestKind::Hls => files.hls,
            ManifestKind::Dash => files.dash,
        }
        .ok_or_else(|| {
            ResolveError::missing_field(CONFIG_STEP, format!("request.files.{}", self.kind))
        })?;

        entry.default_url().map(ToOwned::to_owned).ok_or_else(|| {
            ResolveError::missing_field(
                CONFIG_STEP,
                format!("request.files.{}.cdns[default_cdn].url", self.kind),
            )
        })
    }
}

#[async_trait]
impl ManifestResolver for VimeoResolver {
    async fn resolve(&self, content_id: &str) -> Result<String, ResolveError> {
        let video_id = parse_content_id(content_id)?;
        debug!(video_id, kind = %self.kind, "Resolving manifest URL");

        let token = self.fetch_token().await?;
        let config_url = self.fetch_config_url(video_id, &token).await?;
        debug!(config_url = %config_url, "Got player config URL");
        let manifest_url = self.fetch_manifest_url(&config_url).await?;

        info!("{} Manifest URL => {}", self.kind.as_str().to_uppercase(), manifest_url);
        Ok(manifest_url)
    }
}
