//! Vimeo JSON stream manifests to HLS playlists.
//!
//! Given the URL of a Vimeo segment manifest, [`PlaylistGenerator`] ranks the
//! video and audio renditions, writes one init segment and one media playlist
//! per rendition, and finishes with a master playlist tying them together.
//! [`VimeoResolver`] turns a video id or page URL into such a manifest URL.

pub mod client;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod playlist;
pub mod resolver;
mod utils;

pub use client::{ClientConfig, DEFAULT_UA, build_client, default_client};
pub use error::{GeneratorError, ResolveError, Result};
pub use generator::{GenerationPlan, GenerationReport, GeneratorConfig, PlaylistGenerator};
pub use manifest::{Manifest, RankedManifest};
pub use playlist::DEFAULT_GENERATOR_COMMENT;
pub use resolver::{
    ManifestKind, ManifestResolver, VimeoEndpoints, VimeoResolver, parse_content_id,
};
