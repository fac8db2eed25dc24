// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed playback backends.
//!
//! Each backend owns one worker thread that opens the source, reports
//! readiness, then demuxes and decodes under the control of commands sent
//! from the UI thread. Video frames land in a shared slot the view polls;
//! audio samples go straight to the output device.

mod audio;
mod engine;
mod output;
mod pipeline;
mod video;

pub use audio::AudioBackend;
pub use output::{AudioOutput, OutputControls};
pub use video::VideoBackend;

use crate::error::PlaybackError;
use crate::media::{MediaKind, MediaSource};
use crate::playback::backend::{BackendFactory, PlaybackBackend};
use std::sync::Once;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once per process.
///
/// Also enables network protocols for URL sources and caps FFmpeg's own
/// logging at errors.
pub fn init_ffmpeg() -> Result<(), PlaybackError> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(PlaybackError::Other(format!(
                "FFmpeg initialization failed: {e}"
            )));
            return;
        }
        ffmpeg_next::format::network::init();

        // SAFETY: av_log_set_level only writes FFmpeg's global log level.
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
        tracing::debug!("FFmpeg initialized");
    });

    init_result
}

/// Builds FFmpeg backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegBackendFactory;

impl BackendFactory for FfmpegBackendFactory {
    fn create(&mut self, kind: MediaKind, source: &MediaSource) -> Box<dyn PlaybackBackend> {
        match kind {
            MediaKind::Video => Box::new(VideoBackend::new(source.clone())),
            MediaKind::Audio => Box::new(AudioBackend::new(source.clone())),
        }
    }
}
