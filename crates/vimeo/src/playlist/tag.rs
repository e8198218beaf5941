//! Typed playlist lines.
//!
//! A playlist is an ordered list of [`Tag`] records rendered to text in one
//! pass. Attribute quoting lives in [`AttributeValue`], so callers never build
//! tag syntax by hand.

use std::fmt;

use crate::utils::format_decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    Vod,
}

impl PlaylistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistType::Vod => "VOD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "AUDIO",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Integer(u64),
    Quoted(String),
    Enumerated(&'static str),
    Resolution { width: u64, height: u64 },
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{v}"),
            // quoted-string may not contain '"', CR or LF
            AttributeValue::Quoted(s) => {
                f.write_str("\"")?;
                for c in s.chars().filter(|c| !matches!(c, '"' | '\r' | '\n')) {
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            AttributeValue::Enumerated(s) => f.write_str(s),
            AttributeValue::Resolution { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// Ordered `NAME=value` pairs of a tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeList(Vec<(&'static str, AttributeValue)>);

impl AttributeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: AttributeValue) -> &mut Self {
        self.0.push((name, value));
        self
    }

    pub fn push_opt(&mut self, name: &'static str, value: Option<AttributeValue>) -> &mut Self {
        if let Some(value) = value {
            self.0.push((name, value));
        }
        self
    }
}

impl fmt::Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Header,
    Version(u8),
    MediaSequence(u64),
    PlaylistType(PlaylistType),
    /// A comment line; the text is written after a single `#`.
    Comment(String),
    Map { uri: String },
    TargetDuration(u64),
    Inf { duration: f64 },
    /// A bare URI line following `EXTINF` or `EXT-X-STREAM-INF`.
    Uri(String),
    EndList,
    Media(AttributeList),
    StreamInf(AttributeList),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Header => f.write_str("#EXTM3U"),
            Tag::Version(v) => write!(f, "#EXT-X-VERSION:{v}"),
            Tag::MediaSequence(seq) => write!(f, "#EXT-X-MEDIA-SEQUENCE:{seq}"),
            Tag::PlaylistType(t) => write!(f, "#EXT-X-PLAYLIST-TYPE:{}", t.as_str()),
            Tag::Comment(text) => write!(f, "#{}", text.replace(['\r', '\n'], " ")),
            Tag::Map { uri } => write!(
                f,
                "#EXT-X-MAP:URI={}",
                AttributeValue::Quoted(uri.clone())
            ),
            Tag::TargetDuration(d) => write!(f, "#EXT-X-TARGETDURATION:{d}"),
            Tag::Inf { duration } => write!(f, "#EXTINF:{},", format_decimal(*duration)),
            Tag::Uri(uri) => f.write_str(uri),
            Tag::EndList => f.write_str("#EXT-X-ENDLIST"),
            Tag::Media(attrs) => write!(f, "#EXT-X-MEDIA:{attrs}"),
            Tag::StreamInf(attrs) => write!(f, "#EXT-X-STREAM-INF:{attrs}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tags: Vec<Tag>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    /// Renders every tag on its own `\n`-terminated line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in &self.tags {
            writeln!(f, "{tag}")?;
        }
        Ok(())
    }
}
