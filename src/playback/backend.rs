// SPDX-License-Identifier: MPL-2.0
//! Capability set the controller expects from a media backend.

use crate::error::PlaybackError;
use crate::media::{MediaKind, MediaSource};
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Facts about a source that become valid once the backend is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaInfo {
    /// Total duration in milliseconds (0 when unknown, e.g. live streams).
    pub duration_ms: u64,
}

/// Outcome of preparing a source.
pub type PrepareResult = Result<MediaInfo, PlaybackError>;

/// One-shot ready signal of a backend.
///
/// Preparation happens off the UI thread; the controller hands this to the
/// application layer, which awaits it and reports back.
pub struct Preparation {
    rx: oneshot::Receiver<PrepareResult>,
}

impl Preparation {
    /// Creates a pending preparation and the sender that completes it.
    pub fn channel() -> (oneshot::Sender<PrepareResult>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Creates an already completed preparation.
    pub fn ready(result: PrepareResult) -> Self {
        let (tx, preparation) = Self::channel();
        let _ = tx.send(result);
        preparation
    }

    /// Waits for the ready signal.
    ///
    /// A backend dropped before answering yields [`PlaybackError::Disconnected`].
    pub async fn wait(self) -> PrepareResult {
        self.rx.await.unwrap_or(Err(PlaybackError::Disconnected))
    }
}

impl fmt::Debug for Preparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preparation").finish_non_exhaustive()
    }
}

/// A decoded video frame ready for display.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba_data: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
    /// Increases with every published frame; lets the view skip unchanged frames.
    pub sequence: u64,
}

/// A backend bound to exactly one source.
///
/// Position and duration queries are only meaningful after the ready
/// signal returned by [`prepare`](Self::prepare) fired.
pub trait PlaybackBackend: Send {
    fn kind(&self) -> MediaKind;

    /// Starts asynchronous preparation of the bound source.
    fn prepare(&mut self) -> Preparation;

    /// Starts or resumes playback. After end of stream, restarts from zero.
    fn start(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    fn current_position_ms(&self) -> u64;

    /// Total duration in milliseconds (0 before ready or when unknown).
    fn duration_ms(&self) -> u64;

    /// Seeks to an absolute position.
    fn seek_to(&mut self, position_ms: u64);

    /// Stops playback, keeping the handle until [`release`](Self::release).
    fn stop(&mut self);

    /// Frees native resources. Calling it twice is harmless.
    fn release(&mut self);

    /// Sets output gain (0.0 mutes).
    fn set_volume(&mut self, _volume: f32) {}

    /// Latest frame for the video surface; audio backends have none.
    fn latest_frame(&self) -> Option<DecodedFrame> {
        None
    }
}

/// Constructs backends bound to a source.
pub trait BackendFactory {
    fn create(&mut self, kind: MediaKind, source: &MediaSource) -> Box<dyn PlaybackBackend>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_preparation_resolves_immediately() {
        let info = MediaInfo {
            duration_ms: 120_000,
        };
        let result = Preparation::ready(Ok(info)).wait().await;
        assert_eq!(result, Ok(info));
    }

    #[tokio::test]
    async fn preparation_completes_from_sender() {
        let (tx, preparation) = Preparation::channel();
        let waiter = tokio::spawn(preparation.wait());
        tx.send(Err(PlaybackError::NoStream))
            .expect("receiver alive");
        let result = waiter.await.expect("task joined");
        assert_eq!(result, Err(PlaybackError::NoStream));
    }

    #[tokio::test]
    async fn dropped_sender_reports_disconnect() {
        let (tx, preparation) = Preparation::channel();
        drop(tx);
        assert_eq!(preparation.wait().await, Err(PlaybackError::Disconnected));
    }
}
