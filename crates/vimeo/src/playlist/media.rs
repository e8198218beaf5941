use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};
use url::Url;

use super::tag::{Playlist, PlaylistType, Tag};
use crate::error::{GeneratorError, Result};
use crate::manifest::Rendition;
use crate::utils::resolve_url;

pub const MEDIA_PLAYLIST_VERSION: u8 = 4;

/// A media playlist and its init segment, built but not yet written.
#[derive(Debug, Clone)]
pub struct MediaPlaylistOutput {
    pub playlist_filename: String,
    pub init_filename: String,
    pub init_segment: Vec<u8>,
    pub playlist: Playlist,
    pub target_duration: u64,
}

/// A segment with its absolute URL and clamped duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSegment {
    pub duration: f64,
    pub url: Url,
}

/// `EXT-X-TARGETDURATION` must be an integer upper bound of every segment.
pub fn target_duration(max_duration: f64) -> u64 {
    // `as` saturates for durations beyond u64::MAX
    (max_duration.max(0.0).floor() as u64).saturating_add(1)
}

/// Resolves every segment of `rendition` against `main_base`, keeping the
/// manifest order. Negative durations are clamped to zero.
pub fn resolve_segments<R: Rendition>(
    rendition: &R,
    main_base: &Url,
) -> Result<Vec<ResolvedSegment>> {
    let stream_base = resolve_url(main_base, rendition.base_url())?;
    debug!(
        rendition = rendition.id_or_default(),
        kind = %R::KIND,
        stream_base = %stream_base,
        "Resolving segments"
    );

    rendition
        .segments()
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let mut duration = segment.duration();
            if duration < 0.0 {
                warn!(
                    rendition = rendition.id_or_default(),
                    index,
                    start = segment.start,
                    end = segment.end,
                    "Segment ends before it starts, clamping duration to 0"
                );
                duration = 0.0;
            }
            let url = resolve_url(&stream_base, Some(&segment.url))?;
            Ok(ResolvedSegment { duration, url })
        })
        .collect()
}

fn decode_init_segment<R: Rendition>(rendition: &R) -> Result<Vec<u8>> {
    let name = format!("{}_{}", rendition.id_or_default(), R::KIND);
    let encoded = rendition
        .init_segment()
        .ok_or_else(|| GeneratorError::decode(&name, "init_segment is missing"))?;
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| GeneratorError::decode(&name, e.to_string()))
}

/// Builds the media playlist for one rendition.
pub fn build_media_playlist<R: Rendition>(
    rendition: &R,
    main_base: &Url,
    comment: &str,
) -> Result<MediaPlaylistOutput> {
    let segments = resolve_segments(rendition, main_base)?;
    let init_segment = decode_init_segment(rendition)?;
    let init_filename = rendition.init_filename();

    let max_duration = segments.iter().map(|s| s.duration).fold(0.0, f64::max);
    let target_duration = target_duration(max_duration);

    let mut playlist = Playlist::new();
    playlist
        .push(Tag::Header)
        .push(Tag::Version(MEDIA_PLAYLIST_VERSION))
        .push(Tag::MediaSequence(0))
        .push(Tag::PlaylistType(PlaylistType::Vod))
        .push(Tag::Comment(comment.to_owned()))
        .push(Tag::Map {
            uri: init_filename.clone(),
        })
        .push(Tag::TargetDuration(target_duration));

    for segment in segments {
        playlist
            .push(Tag::Inf {
                duration: segment.duration,
            })
            .push(Tag::Uri(segment.url.into()));
    }
    playlist.push(Tag::EndList);

    Ok(MediaPlaylistOutput {
        playlist_filename: rendition.playlist_filename(),
        init_filename,
        init_segment,
        playlist,
        target_duration,
    })
}
