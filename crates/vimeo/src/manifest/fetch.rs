use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::models::{AudioRendition, Manifest, VideoRendition};
use crate::error::{GeneratorError, Result};
use crate::utils::resolve_url;

/// Downloads the manifest body with a single GET. Anything but `200 OK` is a
/// failure; there are no retries.
pub async fn fetch_manifest(client: &Client, url: &Url) -> Result<String> {
    debug!(url = %url, "Fetching manifest");
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(GeneratorError::http_status(status, url.as_str()));
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), "Manifest downloaded");
    Ok(body)
}

/// Parses a manifest body. A manifest without a single rendition is reported
/// as [`GeneratorError::EmptyManifest`], distinct from malformed JSON.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_json::from_str(text)?;
    if manifest.is_empty() {
        return Err(GeneratorError::EmptyManifest);
    }
    debug!(
        clip_id = manifest.clip_id(),
        video = manifest.video.len(),
        audio = manifest.audio.len(),
        "Parsed manifest"
    );
    Ok(manifest)
}

/// Renditions in emission order plus the resolved manifest base.
#[derive(Debug, Clone)]
pub struct RankedManifest {
    pub clip_id: String,
    pub main_base: Url,
    pub video: Vec<VideoRendition>,
    pub audio: Vec<AudioRendition>,
}

impl RankedManifest {
    pub fn master_filename(&self) -> String {
        format!("master_{}.m3u8", self.clip_id)
    }
}

/// Orders video by descending pixel area and audio by descending
/// `sample_rate * bitrate`. Both sorts are stable, nothing is dropped.
pub fn rank_renditions(playlist_url: &Url, manifest: Manifest) -> Result<RankedManifest> {
    let main_base = resolve_url(playlist_url, manifest.base_url.as_deref())?;
    let clip_id = manifest.clip_id().to_owned();

    let mut video = manifest.video;
    video.sort_by(|a, b| b.pixel_area().cmp(&a.pixel_area()));

    let mut audio = manifest.audio;
    audio.sort_by(|a, b| b.quality_score().cmp(&a.quality_score()));

    Ok(RankedManifest {
        clip_id,
        main_base,
        video,
        audio,
    })
}
