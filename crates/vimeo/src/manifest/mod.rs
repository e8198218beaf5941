mod fetch;
pub mod models;

pub use fetch::{RankedManifest, fetch_manifest, parse_manifest, rank_renditions};
pub use models::{
    AudioRendition, Manifest, NO_ID, Rendition, RenditionKind, Segment, VideoRendition,
};
