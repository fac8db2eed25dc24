// SPDX-License-Identifier: MPL-2.0
//! UI-side handle to a backend's worker thread.

use super::output::OutputControls;
use super::pipeline;
use crate::error::PlaybackError;
use crate::media::{MediaKind, MediaSource};
use crate::playback::backend::{DecodedFrame, Preparation};
use crate::playback::clock::PlaybackClock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Commands sent to the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WorkerCommand {
    /// Start or resume. Restarts from zero after end of stream.
    Play,
    Pause,
    Seek { position_ms: u64 },
    /// End playback and exit the worker.
    Stop,
}

/// State read by the UI thread and written by the worker.
#[derive(Debug)]
pub(super) struct Shared {
    pub clock: PlaybackClock,
    pub playing: AtomicBool,
    /// Probed duration; written once before the ready signal.
    pub duration_ms: AtomicU64,
    pub frame: Mutex<Option<DecodedFrame>>,
    pub output: Arc<OutputControls>,
}

impl Shared {
    fn new(volume: f32) -> Self {
        Self {
            clock: PlaybackClock::new(),
            playing: AtomicBool::new(false),
            duration_ms: AtomicU64::new(0),
            frame: Mutex::new(None),
            output: Arc::new(OutputControls::new(volume)),
        }
    }

    pub fn publish_frame(&self, frame: Option<DecodedFrame>) {
        if let Ok(mut slot) = self.frame.lock() {
            *slot = frame;
        }
    }
}

pub(super) struct Engine {
    kind: MediaKind,
    source: MediaSource,
    shared: Arc<Shared>,
    command_tx: Option<mpsc::UnboundedSender<WorkerCommand>>,
    prepared: bool,
}

impl Engine {
    pub fn new(kind: MediaKind, source: MediaSource) -> Self {
        Self {
            kind,
            source,
            shared: Arc::new(Shared::new(1.0)),
            command_tx: None,
            prepared: false,
        }
    }

    /// Spawns the worker, which opens the source and answers through the
    /// returned preparation.
    pub fn prepare(&mut self) -> Preparation {
        if self.prepared {
            return Preparation::ready(Err(PlaybackError::Other(
                "backend already prepared".to_string(),
            )));
        }
        self.prepared = true;

        let (ready_tx, preparation) = Preparation::channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let kind = self.kind;
        let locator = self.source.locator();
        let shared = Arc::clone(&self.shared);

        let spawned = std::thread::Builder::new()
            .name(format!("{kind}-decoder"))
            .spawn(move || pipeline::run(kind, &locator, command_rx, &shared, ready_tx));

        match spawned {
            Ok(_) => {
                self.command_tx = Some(command_tx);
                preparation
            }
            Err(err) => Preparation::ready(Err(PlaybackError::Other(format!(
                "failed to spawn decoder thread: {err}"
            )))),
        }
    }

    fn send(&self, command: WorkerCommand) {
        if let Some(tx) = &self.command_tx {
            if tx.send(command).is_err() {
                tracing::debug!(?command, source = %self.source, "decoder already exited");
            }
        }
    }

    pub fn start(&mut self) {
        self.send(WorkerCommand::Play);
        self.shared.playing.store(true, Ordering::SeqCst);
    }

    pub fn pause(&mut self) {
        self.send(WorkerCommand::Pause);
        self.shared.playing.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }

    pub fn current_position_ms(&self) -> u64 {
        self.shared.clock.current_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.shared.duration_ms.load(Ordering::SeqCst)
    }

    /// Asks the worker to seek. The clock only moves once the demuxer
    /// accepted the new position.
    pub fn seek_to(&mut self, position_ms: u64) {
        self.send(WorkerCommand::Seek { position_ms });
    }

    pub fn stop(&mut self) {
        self.send(WorkerCommand::Stop);
        self.shared.playing.store(false, Ordering::SeqCst);
        self.shared.publish_frame(None);
    }

    /// Closes the command channel; the worker drops its decoders, input and
    /// audio stream as soon as it notices.
    pub fn release(&mut self) {
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(WorkerCommand::Stop);
            tracing::debug!(source = %self.source, "backend released");
        }
        self.shared.playing.store(false, Ordering::SeqCst);
        self.shared.output.set_paused(true);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.shared.output.set_volume(volume);
    }

    pub fn latest_frame(&self) -> Option<DecodedFrame> {
        self.shared.frame.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_source() -> MediaSource {
        MediaSource::File("/nonexistent/iced_deck/clip.mp3".into())
    }

    #[tokio::test]
    async fn prepare_reports_open_failure() {
        let mut engine = Engine::new(MediaKind::Audio, missing_source());
        let result = engine.prepare().wait().await;
        assert!(result.is_err());
        assert!(!engine.is_playing());
    }

    #[tokio::test]
    async fn second_prepare_is_rejected() {
        let mut engine = Engine::new(MediaKind::Video, missing_source());
        let _first = engine.prepare();
        let second = engine.prepare().wait().await;
        assert!(matches!(second, Err(PlaybackError::Other(_))));
    }

    #[test]
    fn commands_before_prepare_are_dropped() {
        let mut engine = Engine::new(MediaKind::Audio, missing_source());
        engine.start();
        engine.seek_to(1_500);
        assert_eq!(engine.current_position_ms(), 0);
        engine.stop();
        assert!(!engine.is_playing());
        assert!(engine.latest_frame().is_none());
    }

    #[tokio::test]
    async fn seek_not_applied_by_the_worker_keeps_the_clock() {
        let mut engine = Engine::new(MediaKind::Video, missing_source());
        assert!(engine.prepare().wait().await.is_err());

        engine.seek_to(5_000);
        std::thread::sleep(std::time::Duration::from_millis(30));

        assert_eq!(engine.current_position_ms(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let mut engine = Engine::new(MediaKind::Audio, missing_source());
        let _preparation = engine.prepare();
        engine.release();
        engine.release();
        assert!(!engine.is_playing());
    }

    #[test]
    fn volume_reaches_output_controls() {
        let mut engine = Engine::new(MediaKind::Audio, missing_source());
        engine.set_volume(0.3);
        assert!((engine.shared.output.volume() - 0.3).abs() < f32::EPSILON);
    }
}
