// SPDX-License-Identifier: MPL-2.0
//! FFmpeg backend tests against real media.
//!
//! Tests skip when `tests/data/sample.mp4` / `sample.mp3` are absent. Tests
//! that start playback need an audio device and are ignored by default.

use iced_deck::error::PlaybackError;
use iced_deck::media::{MediaKind, MediaSource};
use iced_deck::playback::{BackendFactory, FfmpegBackendFactory, PlaybackBackend};
use std::path::Path;
use std::time::Duration;

const SAMPLE_MP4: &str = "tests/data/sample.mp4";
const SAMPLE_MP3: &str = "tests/data/sample.mp3";

fn sample(path: &str) -> Option<MediaSource> {
    if Path::new(path).exists() {
        Some(MediaSource::File(path.into()))
    } else {
        eprintln!("Skipping: {path} not found");
        None
    }
}

fn backend(kind: MediaKind, source: &MediaSource) -> Box<dyn PlaybackBackend> {
    FfmpegBackendFactory.create(kind, source)
}

#[tokio::test]
async fn missing_file_reports_open_error() {
    let source = MediaSource::File("tests/data/this_file_does_not_exist.mp4".into());
    let mut backend = backend(MediaKind::Video, &source);

    let result = backend.prepare().wait().await;
    assert!(
        matches!(result, Err(PlaybackError::Open(_) | PlaybackError::Other(_))),
        "unexpected result: {result:?}"
    );
    backend.release();
}

#[tokio::test]
async fn corrupted_file_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("corrupted.mp4");
    std::fs::write(&path, b"definitely not an mp4 container").expect("write file");

    let mut backend = backend(MediaKind::Video, &MediaSource::File(path));
    assert!(backend.prepare().wait().await.is_err());
    backend.release();
}

#[tokio::test]
async fn video_prepare_reports_duration() {
    let Some(source) = sample(SAMPLE_MP4) else {
        return;
    };
    let mut backend = backend(MediaKind::Video, &source);

    let info = match backend.prepare().wait().await {
        Ok(info) => info,
        // Headless machines without an output device still open video silently,
        // so any error here is a real failure.
        Err(err) => panic!("video preparation failed: {err}"),
    };
    assert!(info.duration_ms > 0);
    assert_eq!(backend.duration_ms(), info.duration_ms);
    assert_eq!(backend.current_position_ms(), 0);
    backend.release();
}

#[tokio::test]
async fn video_seek_while_paused_publishes_preview_frame() {
    let Some(source) = sample(SAMPLE_MP4) else {
        return;
    };
    let mut backend = backend(MediaKind::Video, &source);
    let info = backend.prepare().wait().await.expect("prepare sample.mp4");

    let target_ms = info.duration_ms / 2;
    backend.seek_to(target_ms);

    let mut frame = None;
    for _ in 0..100 {
        frame = backend.latest_frame();
        if frame.is_some() && backend.current_position_ms() == target_ms {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(backend.current_position_ms(), target_ms);
    let frame = frame.expect("preview frame after paused seek");
    assert_eq!(
        frame.rgba_data.len(),
        frame.width as usize * frame.height as usize * 4
    );
    backend.release();
}

#[tokio::test]
#[ignore = "requires audio hardware"]
async fn audio_plays_and_advances() {
    let Some(source) = sample(SAMPLE_MP3) else {
        return;
    };
    let mut backend = backend(MediaKind::Audio, &source);
    let info = backend.prepare().wait().await.expect("prepare sample.mp3");
    assert!(info.duration_ms > 0);

    backend.start();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(backend.is_playing());
    assert!(backend.current_position_ms() >= 200);

    backend.pause();
    let paused_at = backend.current_position_ms();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.current_position_ms(), paused_at);

    backend.stop();
    backend.release();
    assert!(!backend.is_playing());
}
