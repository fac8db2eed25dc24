// SPDX-License-Identifier: MPL-2.0
//! Playback sessions: the controller state machine, the backend seam and
//! the FFmpeg implementation behind it.

pub mod backend;
pub mod clock;
pub mod controller;
pub mod ffmpeg;
pub mod session;
pub mod ticker;

pub use backend::{BackendFactory, DecodedFrame, MediaInfo, PlaybackBackend, Preparation, PrepareResult};
pub use controller::{Controller, Effect, Notice, VolumeSettings};
pub use ffmpeg::FfmpegBackendFactory;
pub use session::{SeekOrigin, SessionId, SessionState, UiState};
pub use ticker::{TickerHandle, TickerId};
