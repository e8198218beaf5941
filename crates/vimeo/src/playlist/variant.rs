use serde::Serialize;

use crate::manifest::{AudioRendition, Rendition, VideoRendition};

/// What the master playlist needs to know about an emitted video playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoVariant {
    pub playlist: String,
    pub width: u64,
    pub height: u64,
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
}

impl VideoVariant {
    pub fn from_rendition(video: &VideoRendition) -> Self {
        Self {
            playlist: video.playlist_filename(),
            width: video.width(),
            height: video.height(),
            bandwidth: video.bitrate(),
            average_bandwidth: video.avg_bitrate,
            codecs: video.codecs.clone(),
        }
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// What the master playlist needs to know about an emitted audio playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioVariant {
    pub playlist: String,
    pub channels: Option<u64>,
    pub bitrate: u64,
    pub sample_rate: u64,
}

impl AudioVariant {
    pub fn from_rendition(audio: &AudioRendition) -> Self {
        Self {
            playlist: audio.playlist_filename(),
            channels: audio.channels,
            bitrate: audio.bitrate(),
            sample_rate: audio.sample_rate(),
        }
    }
}
