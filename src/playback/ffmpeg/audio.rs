// SPDX-License-Identifier: MPL-2.0
//! Audio-only backend.

use super::engine::Engine;
use crate::media::{MediaKind, MediaSource};
use crate::playback::backend::{PlaybackBackend, Preparation};

pub struct AudioBackend {
    engine: Engine,
}

impl AudioBackend {
    pub fn new(source: MediaSource) -> Self {
        Self {
            engine: Engine::new(MediaKind::Audio, source),
        }
    }
}

impl PlaybackBackend for AudioBackend {
    fn kind(&self) -> MediaKind {
        MediaKind::Audio
    }

    fn prepare(&mut self) -> Preparation {
        self.engine.prepare()
    }

    fn start(&mut self) {
        self.engine.start();
    }

    fn pause(&mut self) {
        self.engine.pause();
    }

    fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    fn current_position_ms(&self) -> u64 {
        self.engine.current_position_ms()
    }

    fn duration_ms(&self) -> u64 {
        self.engine.duration_ms()
    }

    fn seek_to(&mut self, position_ms: u64) {
        self.engine.seek_to(position_ms);
    }

    fn stop(&mut self) {
        self.engine.stop();
    }

    fn release(&mut self) {
        self.engine.release();
    }

    fn set_volume(&mut self, volume: f32) {
        self.engine.set_volume(volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;

    #[tokio::test]
    async fn missing_file_fails_preparation() {
        let mut backend = AudioBackend::new(MediaSource::File("/nonexistent/song.mp3".into()));
        let result = backend.prepare().wait().await;
        assert!(matches!(
            result,
            Err(PlaybackError::Open(_) | PlaybackError::Other(_))
        ));
        backend.release();
    }
}
