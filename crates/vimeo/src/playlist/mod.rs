//! HLS playlist emission (RFC 8216).

pub mod master;
pub mod media;
pub mod tag;
mod variant;

pub use master::{AUDIO_GROUP_ID, build_master_playlist};
pub use media::{MediaPlaylistOutput, build_media_playlist};
pub use tag::{Playlist, Tag};
pub use variant::{AudioVariant, VideoVariant};

/// Comment line written after `#EXTM3U`; rendered as `## Generated by ...`.
pub const DEFAULT_GENERATOR_COMMENT: &str = "# Generated by vimeo-hls";
