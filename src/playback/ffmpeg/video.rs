// SPDX-License-Identifier: MPL-2.0
//! Video backend: decoded frames go to a shared slot, sound to the default device.

use super::engine::Engine;
use crate::media::{MediaKind, MediaSource};
use crate::playback::backend::{DecodedFrame, PlaybackBackend, Preparation};

pub struct VideoBackend {
    engine: Engine,
}

impl VideoBackend {
    pub fn new(source: MediaSource) -> Self {
        Self {
            engine: Engine::new(MediaKind::Video, source),
        }
    }
}

impl PlaybackBackend for VideoBackend {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
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

    fn latest_frame(&self) -> Option<DecodedFrame> {
        self.engine.latest_frame()
    }
}
