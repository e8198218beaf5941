//! Manifest URL in, playlist files out.
//!
//! The run is split into pure stages that hand immutable values to each other:
//!
//! 1. fetch and parse the manifest, rank its renditions ([`RankedManifest`])
//! 2. build every media playlist and decode every init segment in memory
//!    ([`GenerationPlan`])
//! 3. write the plan to the output directory ([`GenerationReport`])
//!
//! Because stage 2 completes before the first write, a manifest that fails to
//! parse, is empty, carries a broken init segment or names a file outside the
//! output directory leaves that directory untouched.
//!
//! File names derive from rendition ids. Two renditions of one kind sharing
//! an id map to the same files; the later one wins and a warning is logged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{GeneratorError, Result};
use crate::manifest::{
    Manifest, RankedManifest, fetch_manifest, parse_manifest, rank_renditions,
};
use crate::playlist::{
    AudioVariant, DEFAULT_GENERATOR_COMMENT, MediaPlaylistOutput, Playlist, VideoVariant,
    build_master_playlist, build_media_playlist,
};
use crate::utils::{ensure_plain_file_name, parse_url};

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory receiving every generated file; created on demand.
    pub output_dir: PathBuf,

    /// Comment line written into every playlist.
    pub comment: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            comment: DEFAULT_GENERATOR_COMMENT.to_owned(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Everything a run will write, in write order.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    /// Video outputs followed by audio outputs.
    pub media: Vec<MediaPlaylistOutput>,
    pub video: Vec<VideoVariant>,
    pub audio: Vec<AudioVariant>,
    pub master_filename: String,
    pub master: Playlist,
}

impl GenerationPlan {
    /// Builds all playlists for an already ranked manifest. Fails before
    /// anything is written if a file name taken from the manifest would
    /// leave the output directory.
    pub fn build(ranked: &RankedManifest, comment: &str) -> Result<Self> {
        let mut media = Vec::with_capacity(ranked.video.len() + ranked.audio.len());
        let mut video = Vec::with_capacity(ranked.video.len());
        for rendition in &ranked.video {
            media.push(build_media_playlist(rendition, &ranked.main_base, comment)?);
            video.push(VideoVariant::from_rendition(rendition));
        }

        let mut audio = Vec::with_capacity(ranked.audio.len());
        for rendition in &ranked.audio {
            media.push(build_media_playlist(rendition, &ranked.main_base, comment)?);
            audio.push(AudioVariant::from_rendition(rendition));
        }

        let master_filename = ranked.master_filename();
        ensure_plain_file_name(&master_filename)?;

        let mut seen = HashSet::new();
        for output in &media {
            ensure_plain_file_name(&output.init_filename)?;
            ensure_plain_file_name(&output.playlist_filename)?;
            if !seen.insert(output.playlist_filename.as_str()) {
                warn!(
                    playlist = %output.playlist_filename,
                    "Duplicate rendition id, later rendition overwrites the earlier one"
                );
            }
        }

        let master = build_master_playlist(&video, &audio, comment);

        Ok(Self {
            media,
            video,
            audio,
            master_filename,
            master,
        })
    }

    /// Writes the plan into `output_dir`: every init segment and media
    /// playlist first, the master playlist last.
    pub async fn write(self, output_dir: &Path) -> Result<GenerationReport> {
        ensure_output_dir(output_dir).await?;

        let mut files: Vec<PathBuf> = Vec::new();
        for output in &self.media {
            let init_path = output_dir.join(&output.init_filename);
            write_file(&init_path, &output.init_segment).await?;

            let playlist_path = output_dir.join(&output.playlist_filename);
            write_file(&playlist_path, output.playlist.render().as_bytes()).await?;
            info!(
                playlist = %output.playlist_filename,
                target_duration = output.target_duration,
                "Saved media playlist"
            );

            for path in [init_path, playlist_path] {
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }

        let master_path = output_dir.join(&self.master_filename);
        write_file(&master_path, self.master.render().as_bytes()).await?;
        files.push(master_path);

        Ok(GenerationReport {
            master_playlist: self.master_filename,
            output_dir: output_dir.to_path_buf(),
            video: self.video,
            audio: self.audio,
            files,
        })
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub master_playlist: String,
    pub output_dir: PathBuf,
    pub video: Vec<VideoVariant>,
    pub audio: Vec<AudioVariant>,
    pub files: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn master_path(&self) -> PathBuf {
        self.output_dir.join(&self.master_playlist)
    }
}

/// Ensure the output directory exists, creating intermediate directories.
pub async fn ensure_output_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| GeneratorError::file_system(path, e))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    debug!(path = %path.display(), bytes = contents.len(), "Writing file");
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| GeneratorError::file_system(path, e))
}

/// Fetches a manifest and writes its HLS playlist set.
#[derive(Debug, Clone)]
pub struct PlaylistGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl PlaylistGenerator {
    pub fn new(client: Client, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the whole pipeline for `playlist_url`.
    pub async fn generate(&self, playlist_url: &str) -> Result<GenerationReport> {
        let url = parse_url(playlist_url)?;
        let body = fetch_manifest(&self.client, &url).await?;
        let manifest = parse_manifest(&body)?;
        self.generate_from_manifest(&url, manifest).await
    }

    /// Runs the emission stages for a manifest that was fetched from `playlist_url`.
    pub async fn generate_from_manifest(
        &self,
        playlist_url: &Url,
        manifest: Manifest,
    ) -> Result<GenerationReport> {
        if manifest.is_empty() {
            return Err(GeneratorError::EmptyManifest);
        }
        let ranked = rank_renditions(playlist_url, manifest)?;
        debug!(main_base = %ranked.main_base, "Resolved manifest base");

        let plan = GenerationPlan::build(&ranked, &self.config.comment)?;
        let report = plan.write(&self.config.output_dir).await?;
        info!("Master Playlist => {}", report.master_playlist);
        Ok(report)
    }
}
