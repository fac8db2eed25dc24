// SPDX-License-Identifier: MPL-2.0
//! The playback controller: single authority over session lifecycle and
//! player visibility.
//!
//! The controller never blocks and never waits. Operations that need the
//! outside world return an [`Effect`]; the application layer turns
//! [`Effect::AwaitReady`] into an async task that calls
//! [`Controller::on_ready`] and [`Effect::Notify`] into a toast.

use crate::error::PlaybackError;
use crate::media::{self, MediaKind, MediaSource};
use crate::playback::backend::{
    BackendFactory, DecodedFrame, MediaInfo, PlaybackBackend, Preparation,
};
use crate::playback::session::{SeekOrigin, SessionId, SessionState, UiState};
use crate::playback::ticker::{Ticker, TickerHandle, TickerId};
use std::time::Duration;

/// User-visible transient notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// URL entry text without a supported suffix.
    UnsupportedMediaType,
    /// Picked file whose MIME type is neither audio nor video.
    UndefinedFileType,
}

impl Notice {
    pub fn i18n_key(self) -> &'static str {
        match self {
            Notice::UnsupportedMediaType => "notification-unsupported-media-type",
            Notice::UndefinedFileType => "notification-undefined-file-type",
        }
    }
}

/// Follow-up work requested by a controller operation.
#[derive(Debug)]
pub enum Effect {
    None,
    Notify(Notice),
    /// Await `preparation`, then report to [`Controller::on_ready`] with `session`.
    AwaitReady {
        session: SessionId,
        preparation: Preparation,
    },
}

impl Effect {
    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

struct ActiveSession {
    id: SessionId,
    kind: MediaKind,
    source: MediaSource,
    backend: Box<dyn PlaybackBackend>,
}

/// Output gain settings applied to every backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSettings {
    pub volume: f32,
    pub muted: bool,
}

impl VolumeSettings {
    fn effective(self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            volume: crate::config::DEFAULT_VOLUME,
            muted: false,
        }
    }
}

pub struct Controller<F: BackendFactory> {
    factory: F,
    session: Option<ActiveSession>,
    last_session_id: Option<SessionId>,
    state: SessionState,
    ui: UiState,
    ticker: Ticker,
    active_ticker: Option<TickerHandle>,
    volume: VolumeSettings,
}

impl<F: BackendFactory> Controller<F> {
    pub fn new(factory: F, tick_interval: Duration, volume: VolumeSettings) -> Self {
        Self {
            factory,
            session: None,
            last_session_id: None,
            state: SessionState::Idle,
            ui: UiState::default(),
            ticker: Ticker::new(tick_interval),
            active_ticker: None,
            volume,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn volume(&self) -> VolumeSettings {
        self.volume
    }

    /// Running tick chain, if any. The application subscribes to the
    /// periodic timer only while this is `Some`.
    pub fn ticker(&self) -> Option<&TickerHandle> {
        self.active_ticker.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the current session, if one exists.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub fn session_kind(&self) -> Option<MediaKind> {
        self.session.as_ref().map(|session| session.kind)
    }

    pub fn session_source(&self) -> Option<&MediaSource> {
        self.session.as_ref().map(|session| &session.source)
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_prepared()
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.backend.is_playing())
    }

    pub fn latest_frame(&self) -> Option<DecodedFrame> {
        self.session
            .as_ref()
            .filter(|session| session.kind == MediaKind::Video)
            .and_then(|session| session.backend.latest_frame())
    }

    // ---------------------------------------------------------------------
    // Load paths
    // ---------------------------------------------------------------------

    /// Handles a file returned by the open dialog.
    ///
    /// Routing uses the MIME type prefix; anything that is not audio or
    /// video leaves the state untouched and yields a notice.
    pub fn open_picked(&mut self, source: MediaSource, mime: Option<&str>) -> Effect {
        match media::classify_mime(mime) {
            Some(MediaKind::Video) => self.start_video(source),
            Some(MediaKind::Audio) => self.start_audio(source),
            None => {
                tracing::info!(%source, ?mime, "picked file has no audio/video type");
                Effect::Notify(Notice::UndefinedFileType)
            }
        }
    }

    /// Handles text submitted from the URL entry.
    ///
    /// Input is trimmed; empty input is ignored without a notice. Routing
    /// uses the `.mp4`/`.mp3` suffix only.
    pub fn load_url(&mut self, text: &str) -> Effect {
        let text = text.trim();
        if text.is_empty() {
            return Effect::None;
        }
        match media::classify_url(text) {
            Some(MediaKind::Video) => self.start_video(MediaSource::from_text(text)),
            Some(MediaKind::Audio) => self.start_audio(MediaSource::from_text(text)),
            None => {
                tracing::info!(url = text, "unsupported media type in URL entry");
                Effect::Notify(Notice::UnsupportedMediaType)
            }
        }
    }

    /// Reveals the URL entry.
    pub fn show_url_entry(&mut self) {
        self.ui.url_entry_visible = true;
    }

    pub fn start_video(&mut self, source: MediaSource) -> Effect {
        self.teardown_session();
        self.ui.is_video = true;
        self.ui.video_surface_visible = true;
        self.begin_session(MediaKind::Video, source)
    }

    pub fn start_audio(&mut self, source: MediaSource) -> Effect {
        self.teardown_session();
        self.ui.is_video = false;
        self.ui.video_surface_visible = false;
        self.begin_session(MediaKind::Audio, source)
    }

    fn begin_session(&mut self, kind: MediaKind, source: MediaSource) -> Effect {
        self.ui.paused = false;
        self.ui.user_seeking = false;
        self.ui.controls_visible = true;
        self.ui.url_entry_visible = false;
        self.ui.progress_ms = 0;
        self.ui.progress_max_ms = 0;

        let mut backend = self.factory.create(kind, &source);
        backend.set_volume(self.volume.effective());
        let preparation = backend.prepare();

        let id = self
            .last_session_id
            .map_or_else(SessionId::first, SessionId::next);
        self.last_session_id = Some(id);
        tracing::info!(session = %id, %kind, %source, "loading media");

        self.session = Some(ActiveSession {
            id,
            kind,
            source,
            backend,
        });
        self.state = SessionState::Loading;

        Effect::AwaitReady {
            session: id,
            preparation,
        }
    }

    /// Delivers a backend's ready signal.
    ///
    /// Signals of superseded or stopped sessions are dropped. A failed
    /// preparation is logged and leaves the session in `Loading`.
    pub fn on_ready(&mut self, id: SessionId, result: Result<MediaInfo, PlaybackError>) {
        let Some(session) = self.session.as_mut().filter(|session| session.id == id) else {
            tracing::debug!(session = %id, "ignoring ready signal of a stale session");
            return;
        };
        if !self.state.is_loading() {
            tracing::warn!(session = %id, state = ?self.state, "duplicate ready signal");
            return;
        }

        let info = match result {
            Ok(info) => info,
            Err(err) => {
                tracing::error!(
                    session = %id,
                    source = %session.source,
                    %err,
                    key = err.i18n_key(),
                    "preparation failed"
                );
                return;
            }
        };

        self.state = SessionState::Ready;
        self.ui.progress_max_ms = info.duration_ms;
        session.backend.start();
        self.state = SessionState::Playing;
        tracing::debug!(session = %id, duration_ms = info.duration_ms, "playback started");

        self.restart_ticker();
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Pauses a playing session or resumes a paused one.
    ///
    /// Does nothing without a prepared session.
    pub fn toggle(&mut self) {
        if !self.state.is_prepared() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.backend.is_playing() {
            session.backend.pause();
            self.ui.paused = true;
            self.state = SessionState::Paused;
        } else {
            session.backend.start();
            self.ui.paused = false;
            self.state = SessionState::Playing;
        }
        tracing::debug!(session = %session.id, state = ?self.state, "toggled playback");
    }

    /// Ends the session: ticker cancelled, controls hidden, progress reset.
    pub fn stop(&mut self) {
        self.cancel_ticker();
        self.ui.controls_visible = false;
        self.ui.progress_ms = 0;
        // A drag cannot outlive its session.
        self.ui.user_seeking = false;
        if self.ui.is_video {
            self.ui.video_surface_visible = false;
        }
        let had_session = self.session.is_some();
        self.release_backend();
        self.ui.paused = false;
        if had_session {
            self.state = SessionState::Stopped;
        }
    }

    /// Applies a slider value.
    ///
    /// Only user-originated changes reach the backend; programmatic writes
    /// only move the displayed value.
    pub fn seek(&mut self, position_ms: u64, origin: SeekOrigin) {
        let position_ms = if self.ui.progress_max_ms > 0 {
            position_ms.min(self.ui.progress_max_ms)
        } else {
            position_ms
        };
        self.ui.progress_ms = position_ms;

        if origin != SeekOrigin::User || !self.state.is_prepared() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.backend.seek_to(position_ms);
        }
    }

    pub fn seek_drag_begin(&mut self) {
        self.ui.user_seeking = true;
    }

    pub fn seek_drag_end(&mut self) {
        self.ui.user_seeking = false;
    }

    /// Samples the backend position into the slider.
    ///
    /// Ticks of a cancelled chain and ticks during a user drag are ignored.
    pub fn tick(&mut self, id: TickerId) {
        if !self
            .active_ticker
            .as_ref()
            .is_some_and(|ticker| ticker.accepts(id))
        {
            return;
        }
        if self.ui.user_seeking || !self.state.is_prepared() {
            return;
        }
        if let Some(session) = self.session.as_ref() {
            self.ui.progress_ms = session.backend.current_position_ms();
        }
    }

    /// Applies a new mute state to the controller and the live backend.
    pub fn set_muted(&mut self, muted: bool) {
        self.volume.muted = muted;
        let effective = self.volume.effective();
        if let Some(session) = self.session.as_mut() {
            session.backend.set_volume(effective);
        }
    }

    /// Component teardown: cancels the ticker, then frees the backend.
    pub fn shutdown(&mut self) {
        self.cancel_ticker();
        self.release_backend();
        if self.state.is_active() {
            self.state = SessionState::Stopped;
        }
        tracing::debug!("controller shut down");
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Cancels the previous session's ticker and frees its backend before
    /// a new one is constructed.
    fn teardown_session(&mut self) {
        self.cancel_ticker();
        self.release_backend();
    }

    fn release_backend(&mut self) {
        if let Some(mut session) = self.session.take() {
            if session.kind == MediaKind::Video {
                session.backend.stop();
            }
            session.backend.release();
            tracing::info!(session = %session.id, kind = %session.kind, "released backend");
        }
    }

    fn restart_ticker(&mut self) {
        self.cancel_ticker();
        self.active_ticker = Some(self.ticker.start());
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.active_ticker.take() {
            handle.cancel();
        }
    }
}

impl<F: BackendFactory> Drop for Controller<F> {
    fn drop(&mut self) {
        self.cancel_ticker();
        self.release_backend();
    }
}
