//! Master playlist generator
//!
//! Every audio rendition becomes an `#EXT-X-MEDIA` entry in one shared group
//! and every video rendition an `#EXT-X-STREAM-INF` variant pointing at that
//! group, so clients can pair any video with any audio.

use super::tag::{AttributeList, AttributeValue, MediaType, Playlist, Tag};
use super::variant::{AudioVariant, VideoVariant};
use crate::utils::format_decimal;

pub const AUDIO_GROUP_ID: &str = "default-audio-group";

/// `NAME` of an audio rendition: bitrate in kbps, sample rate and emission
/// index. The index keeps names unique inside the group.
pub fn audio_rendition_name(audio: &AudioVariant, index: usize) -> String {
    format!(
        "{}_{}_{}",
        format_decimal(audio.bitrate as f64 / 1000.0),
        audio.sample_rate,
        index
    )
}

fn media_tag(audio: &AudioVariant, index: usize) -> Tag {
    let mut attrs = AttributeList::new();
    attrs
        .push("TYPE", AttributeValue::Enumerated(MediaType::Audio.as_str()))
        .push("URI", AttributeValue::Quoted(audio.playlist.clone()))
        .push("GROUP-ID", AttributeValue::Quoted(AUDIO_GROUP_ID.to_owned()))
        .push(
            "NAME",
            AttributeValue::Quoted(audio_rendition_name(audio, index)),
        )
        .push_opt(
            "CHANNELS",
            audio
                .channels
                .map(|c| AttributeValue::Quoted(c.to_string())),
        );
    Tag::Media(attrs)
}

fn stream_inf_tag(video: &VideoVariant, has_audio: bool) -> Tag {
    let mut attrs = AttributeList::new();
    attrs
        .push("BANDWIDTH", AttributeValue::Integer(video.bandwidth))
        .push_opt(
            "AVERAGE-BANDWIDTH",
            video.average_bandwidth.map(AttributeValue::Integer),
        )
        .push_opt(
            "CODECS",
            video.codecs.clone().map(AttributeValue::Quoted),
        )
        .push(
            "RESOLUTION",
            AttributeValue::Resolution {
                width: video.width,
                height: video.height,
            },
        );
    // An AUDIO reference to a group with no members is invalid HLS.
    if has_audio {
        attrs.push("AUDIO", AttributeValue::Quoted(AUDIO_GROUP_ID.to_owned()));
    }
    Tag::StreamInf(attrs)
}

/// Builds the master playlist. Audio entries come first, then the video
/// variants, each block in the order given.
pub fn build_master_playlist(
    video: &[VideoVariant],
    audio: &[AudioVariant],
    comment: &str,
) -> Playlist {
    let mut playlist = Playlist::new();
    playlist
        .push(Tag::Header)
        .push(Tag::Comment(comment.to_owned()));

    for (index, variant) in audio.iter().enumerate() {
        playlist.push(media_tag(variant, index));
    }

    for variant in video {
        playlist
            .push(stream_inf_tag(variant, !audio.is_empty()))
            .push(Tag::Uri(variant.playlist.clone()));
    }

    playlist
}
