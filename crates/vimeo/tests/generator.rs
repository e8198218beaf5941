//! End-to-end tests for the playlist generator.
//!
//! Manifests are served by an in-process axum server so the whole
//! fetch, rank, build and write pipeline runs against real HTTP.

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist, parse_playlist_res};
use tempfile::TempDir;
use tokio::net::TcpListener;
use vimeo_hls::{GeneratorConfig, GeneratorError, PlaylistGenerator, default_client};

const MANIFEST_PATH: &str = "/exp/clip42/sep/playlist.json";

const MANIFEST: &str = r#"{
    "clip_id": "clip42",
    "base_url": "../",
    "video": [
        {
            "id": "v360",
            "base_url": "video/360/",
            "width": 640,
            "height": 360,
            "bitrate": 800000,
            "codecs": "avc1.64001E",
            "init_segment": "c21hbGw=",
            "segments": [
                {"start": 0, "end": 6, "url": "seg-1.m4s"},
                {"start": 6, "end": 10.5, "url": "seg-2.m4s"}
            ]
        },
        {
            "id": "v1080",
            "base_url": "video/1080/",
            "width": 1920,
            "height": 1080,
            "bitrate": 5000000,
            "avg_bitrate": 4500000,
            "codecs": "avc1.640028",
            "framerate": 25,
            "init_segment": "aW5pdA==",
            "segments": [
                {"start": 0, "end": 6.006, "url": "seg-1.m4s"},
                {"start": 6.006, "end": 10.5, "url": "seg-2.m4s"}
            ]
        }
    ],
    "audio": [
        {
            "id": "a48",
            "base_url": "audio/48k/",
            "channels": 2,
            "bitrate": 128000,
            "sample_rate": 48000,
            "codecs": "mp4a.40.2",
            "init_segment": "YXVkaW8=",
            "segments": [
                {"start": 0, "end": 6.006, "url": "seg-1.m4s"},
                {"start": 6.006, "end": 10.5, "url": "seg-2.m4s"}
            ]
        }
    ]
}"#;

/// Serves `body` at `path` and returns the server's base URL.
async fn serve(path: &'static str, status: StatusCode, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(path, get(move || async move { (status, body) }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn generator(output: &Path) -> PlaylistGenerator {
    PlaylistGenerator::new(
        default_client().unwrap(),
        GeneratorConfig::default().with_output_dir(output),
    )
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

fn parse_media(input: &str) -> MediaPlaylist {
    match parse_playlist_res(input.as_bytes()).expect("playlist should parse") {
        Playlist::MediaPlaylist(pl) => pl,
        Playlist::MasterPlaylist(_) => panic!("expected media playlist"),
    }
}

fn parse_master(input: &str) -> MasterPlaylist {
    match parse_playlist_res(input.as_bytes()).expect("playlist should parse") {
        Playlist::MasterPlaylist(pl) => pl,
        Playlist::MediaPlaylist(_) => panic!("expected master playlist"),
    }
}

fn sorted_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_generates_full_playlist_set() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, MANIFEST).await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let report = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap();

    assert_eq!(report.master_playlist, "master_clip42.m3u8");
    assert_eq!(report.master_path(), out.join("master_clip42.m3u8"));
    // 2 video + 1 audio: one init and one playlist each, plus the master.
    assert_eq!(report.files.len(), 7);
    assert_eq!(
        sorted_entries(&out),
        [
            "a48_audio.m3u8",
            "a48_audio_init.mp4",
            "master_clip42.m3u8",
            "v1080_video.m3u8",
            "v1080_video_init.mp4",
            "v360_video.m3u8",
            "v360_video_init.mp4",
        ]
    );

    assert_eq!(std::fs::read(out.join("v1080_video_init.mp4")).unwrap(), b"init");
    assert_eq!(std::fs::read(out.join("a48_audio_init.mp4")).unwrap(), b"audio");

    let master = read(&out, "master_clip42.m3u8");
    assert_eq!(
        master,
        "#EXTM3U\n\
         ## Generated by vimeo-hls\n\
         #EXT-X-MEDIA:TYPE=AUDIO,URI=\"a48_audio.m3u8\",GROUP-ID=\"default-audio-group\",NAME=\"128.0_48000_0\",CHANNELS=\"2\"\n\
         #EXT-X-STREAM-INF:BANDWIDTH=5000000,AVERAGE-BANDWIDTH=4500000,CODECS=\"avc1.640028\",RESOLUTION=1920x1080,AUDIO=\"default-audio-group\"\n\
         v1080_video.m3u8\n\
         #EXT-X-STREAM-INF:BANDWIDTH=800000,CODECS=\"avc1.64001E\",RESOLUTION=640x360,AUDIO=\"default-audio-group\"\n\
         v360_video.m3u8\n"
    );

    let video = read(&out, "v1080_video.m3u8");
    assert_eq!(
        video,
        format!(
            "#EXTM3U\n\
             #EXT-X-VERSION:4\n\
             #EXT-X-MEDIA-SEQUENCE:0\n\
             #EXT-X-PLAYLIST-TYPE:VOD\n\
             ## Generated by vimeo-hls\n\
             #EXT-X-MAP:URI=\"v1080_video_init.mp4\"\n\
             #EXT-X-TARGETDURATION:7\n\
             #EXTINF:6.006,\n\
             {server}/exp/clip42/video/1080/seg-1.m4s\n\
             #EXTINF:4.494,\n\
             {server}/exp/clip42/video/1080/seg-2.m4s\n\
             #EXT-X-ENDLIST\n"
        )
    );
}

#[tokio::test]
async fn test_generated_playlists_parse_as_hls() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, MANIFEST).await;
    let temp = TempDir::new().unwrap();

    let report = generator(temp.path())
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap();

    let master = parse_master(&read(temp.path(), &report.master_playlist));
    assert_eq!(master.variants.len(), 2);
    assert_eq!(master.variants[0].uri, "v1080_video.m3u8");
    assert_eq!(master.variants[1].uri, "v360_video.m3u8");
    assert_eq!(master.alternatives.len(), 1);

    for name in ["v1080_video.m3u8", "v360_video.m3u8", "a48_audio.m3u8"] {
        let media = parse_media(&read(temp.path(), name));
        assert_eq!(media.segments.len(), 2, "{name}");
        assert!(media.end_list, "{name}");
        assert!(
            media
                .segments
                .iter()
                .all(|s| s.duration.ceil() as u64 <= media.target_duration),
            "{name}: target duration below a segment duration"
        );
    }
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, MANIFEST).await;
    let url = format!("{server}{MANIFEST_PATH}");
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    generator(first.path()).generate(&url).await.unwrap();
    generator(second.path()).generate(&url).await.unwrap();
    // Overwrites in place too.
    generator(second.path()).generate(&url).await.unwrap();

    let names = sorted_entries(first.path());
    assert_eq!(names, sorted_entries(second.path()));
    for name in names {
        assert_eq!(
            std::fs::read(first.path().join(&name)).unwrap(),
            std::fs::read(second.path().join(&name)).unwrap(),
            "{name} differs between runs"
        );
    }
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, MANIFEST).await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let err = generator(&out)
        .generate(&format!("{server}/missing/playlist.json"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, GeneratorError::HttpStatus { status, .. } if status == StatusCode::NOT_FOUND)
    );
    assert!(err.is_network());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = serve(MANIFEST_PATH, StatusCode::SERVICE_UNAVAILABLE, MANIFEST).await;
    let temp = TempDir::new().unwrap();

    let err = generator(temp.path())
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::HttpStatus { .. }));
}

#[tokio::test]
async fn test_empty_manifest_writes_nothing() {
    let server = serve(
        MANIFEST_PATH,
        StatusCode::OK,
        r#"{"clip_id": "empty", "base_url": "../", "video": [], "audio": []}"#,
    )
    .await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let err = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::EmptyManifest));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_malformed_manifest_writes_nothing() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, "<html>not json</html>").await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let err = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::Parse { .. }));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_broken_init_segment_aborts_before_writing() {
    let server = serve(
        MANIFEST_PATH,
        StatusCode::OK,
        r#"{
            "clip_id": "broken",
            "video": [
                {"id": "ok", "width": 1920, "height": 1080,
                 "init_segment": "aW5pdA==", "segments": []},
                {"id": "bad", "width": 640, "height": 360,
                 "init_segment": "%%%", "segments": []}
            ]
        }"#,
    )
    .await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let err = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Decode { ref rendition, .. } if rendition == "bad_video"
    ));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_missing_ids_use_placeholder() {
    let server = serve(
        MANIFEST_PATH,
        StatusCode::OK,
        r#"{
            "video": [{"init_segment": "aW5pdA==",
                       "segments": [{"start": 0, "end": 2, "url": "v.m4s"}]}],
            "audio": [{"init_segment": "YXVkaW8=",
                       "segments": [{"start": 0, "end": 2, "url": "a.m4s"}]}]
        }"#,
    )
    .await;
    let temp = TempDir::new().unwrap();

    let report = generator(temp.path())
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap();

    assert_eq!(report.master_playlist, "master_NO_ID.m3u8");
    assert_eq!(
        sorted_entries(temp.path()),
        [
            "NO_ID_audio.m3u8",
            "NO_ID_audio_init.mp4",
            "NO_ID_video.m3u8",
            "NO_ID_video_init.mp4",
            "master_NO_ID.m3u8",
        ]
    );

    let master = read(temp.path(), "master_NO_ID.m3u8");
    assert!(master.contains("BANDWIDTH=1,RESOLUTION=1x1"));
    assert!(master.contains("NAME=\"0.001_1_0\""));

    // Without a base_url, segments resolve next to the manifest itself.
    let video = read(temp.path(), "NO_ID_video.m3u8");
    assert!(video.contains(&format!("{server}/exp/clip42/sep/v.m4s\n")));
}

#[tokio::test]
async fn test_custom_comment_is_written_everywhere() {
    let server = serve(MANIFEST_PATH, StatusCode::OK, MANIFEST).await;
    let temp = TempDir::new().unwrap();
    let generator = PlaylistGenerator::new(
        default_client().unwrap(),
        GeneratorConfig::default()
            .with_output_dir(temp.path())
            .with_comment("# archived copy"),
    );

    let report = generator
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap();

    for name in ["master_clip42.m3u8", "v1080_video.m3u8", "a48_audio.m3u8"] {
        assert!(read(temp.path(), name).contains("\n## archived copy\n"), "{name}");
    }
    assert_eq!(report.video.len(), 2);
    assert_eq!(report.audio.len(), 1);
}

#[tokio::test]
async fn test_ids_cannot_escape_output_dir() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let absolute = temp.path().join("outside").join("abs");
    // Leaked so the handler can serve it as a static body.
    let manifest: &'static str = Box::leak(
        format!(
            r#"{{
                "clip_id": "clip",
                "video": [{{"id": "../escaped", "init_segment": "aW5pdA==", "segments": []}}],
                "audio": [{{"id": {}, "init_segment": "YXVkaW8=", "segments": []}}]
            }}"#,
            serde_json::to_string(&absolute.to_string_lossy()).unwrap()
        )
        .into_boxed_str(),
    );
    let server = serve(MANIFEST_PATH, StatusCode::OK, manifest).await;

    let err = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::UnsafeFileName { .. }));
    assert!(!out.exists());
    assert!(!temp.path().join("escaped_video.m3u8").exists());
    assert!(!temp.path().join("escaped_video_init.mp4").exists());
    assert!(!temp.path().join("outside").exists());
}

#[tokio::test]
async fn test_unsafe_clip_id_is_rejected() {
    let server = serve(
        MANIFEST_PATH,
        StatusCode::OK,
        r#"{
            "clip_id": "../up",
            "audio": [{"id": "a", "init_segment": "YXVkaW8=", "segments": []}]
        }"#,
    )
    .await;
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let err = generator(&out)
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::UnsafeFileName { ref name } if name == "master_../up.m3u8"
    ));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_duplicate_ids_report_only_existing_files() {
    let server = serve(
        MANIFEST_PATH,
        StatusCode::OK,
        r#"{
            "clip_id": "dup",
            "video": [
                {"id": "same", "width": 1920, "height": 1080,
                 "init_segment": "Zmlyc3Q=", "segments": []},
                {"id": "same", "width": 640, "height": 360,
                 "init_segment": "c2Vjb25k", "segments": []}
            ]
        }"#,
    )
    .await;
    let temp = TempDir::new().unwrap();

    let report = generator(temp.path())
        .generate(&format!("{server}{MANIFEST_PATH}"))
        .await
        .unwrap();

    assert_eq!(report.video.len(), 2);
    assert_eq!(report.files.len(), 3);
    assert_eq!(sorted_entries(temp.path()).len(), report.files.len());
    assert!(report.files.iter().all(|path| path.exists()));
    // Later rendition in ranked order wins.
    assert_eq!(
        std::fs::read(temp.path().join("same_video_init.mp4")).unwrap(),
        b"second"
    );
}

#[tokio::test]
async fn test_relative_manifest_url_is_rejected() {
    let temp = TempDir::new().unwrap();
    let err = generator(temp.path())
        .generate("exp/clip42/playlist.json")
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidUrl { .. }));
}
