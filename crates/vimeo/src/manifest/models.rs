use std::fmt;

use serde::{Deserialize, Deserializer};

/// Name used for renditions (and clips) that carry no identifier.
pub const NO_ID: &str = "NO_ID";

/// Fallback for numeric keys that are missing from a rendition.
pub const DEFAULT_METRIC: u64 = 1;

/// The provider's JSON stream manifest (`playlist.json` / `master.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub video: Vec<VideoRendition>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub audio: Vec<AudioRendition>,
}

impl Manifest {
    pub fn clip_id(&self) -> &str {
        self.clip_id.as_deref().unwrap_or(NO_ID)
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoRendition {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub bitrate: Option<u64>,
    pub avg_bitrate: Option<u64>,
    pub codecs: Option<String>,
    pub framerate: Option<f64>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    pub init_segment: Option<String>,
}

impl VideoRendition {
    pub fn width(&self) -> u64 {
        self.width.unwrap_or(DEFAULT_METRIC)
    }

    pub fn height(&self) -> u64 {
        self.height.unwrap_or(DEFAULT_METRIC)
    }

    pub fn bitrate(&self) -> u64 {
        self.bitrate.unwrap_or(DEFAULT_METRIC)
    }

    /// Ranking key: pixel area.
    pub fn pixel_area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width(), self.height())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioRendition {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub channels: Option<u64>,
    pub bitrate: Option<u64>,
    pub sample_rate: Option<u64>,
    pub codecs: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    pub init_segment: Option<String>,
}

impl AudioRendition {
    pub fn bitrate(&self) -> u64 {
        self.bitrate.unwrap_or(DEFAULT_METRIC)
    }

    pub fn sample_rate(&self) -> u64 {
        self.sample_rate.unwrap_or(DEFAULT_METRIC)
    }

    /// Ranking key: `sample_rate * bitrate`.
    pub fn quality_score(&self) -> u64 {
        self.sample_rate().saturating_mul(self.bitrate())
    }
}

/// One media segment; `url` is relative to the rendition's base URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub url: String,
}

impl Segment {
    /// Play-out duration in seconds, possibly negative for malformed input.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenditionKind {
    Video,
    Audio,
}

impl RenditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenditionKind::Video => "video",
            RenditionKind::Audio => "audio",
        }
    }
}

impl fmt::Display for RenditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields shared by video and audio renditions that the media playlist
/// emitter needs.
pub trait Rendition {
    const KIND: RenditionKind;

    fn id(&self) -> Option<&str>;
    fn base_url(&self) -> Option<&str>;
    fn segments(&self) -> &[Segment];
    fn init_segment(&self) -> Option<&str>;

    fn id_or_default(&self) -> &str {
        self.id().unwrap_or(NO_ID)
    }

    fn playlist_filename(&self) -> String {
        format!("{}_{}.m3u8", self.id_or_default(), Self::KIND)
    }

    fn init_filename(&self) -> String {
        format!("{}_{}_init.mp4", self.id_or_default(), Self::KIND)
    }
}

impl Rendition for VideoRendition {
    const KIND: RenditionKind = RenditionKind::Video;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn init_segment(&self) -> Option<&str> {
        self.init_segment.as_deref()
    }
}

impl Rendition for AudioRendition {
    const KIND: RenditionKind = RenditionKind::Audio;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn init_segment(&self) -> Option<&str> {
        self.init_segment.as_deref()
    }
}

/// Ids show up both as JSON strings and as bare numbers.
fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

/// `null` rendition lists are treated like absent ones.
fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
