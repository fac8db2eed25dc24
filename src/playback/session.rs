// SPDX-License-Identifier: MPL-2.0
//! Session lifecycle and the UI state owned by the controller.
//!
//! A session moves through:
//! - Idle: nothing loaded (also where rejected input leaves the machine)
//! - Loading: source bound, waiting for the backend's ready signal
//! - Ready: ready signal received, duration known
//! - Playing / Paused: toggled by the user
//! - Stopped: session torn down, back to Idle on the next load

use std::fmt;

/// Lifecycle state of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Stopped,
}

impl SessionState {
    /// True once the ready signal fired and until the session ends.
    ///
    /// Position and duration queries are only valid in these states.
    pub fn is_prepared(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }

    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True while a session holds a backend.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Loading | Self::Ready | Self::Playing | Self::Paused
        )
    }
}

/// Identifies one load action, so late ready signals of a superseded
/// session can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a slider change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// The user moved the slider.
    User,
    /// The application wrote the value (ticker, reset).
    Programmatic,
}

/// Everything the view needs to render the player, owned by the controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    /// Kind of the last started session; kept after stop.
    pub is_video: bool,
    pub paused: bool,
    /// The user is dragging the seek slider; ticks must not overwrite it.
    pub user_seeking: bool,
    pub video_surface_visible: bool,
    pub controls_visible: bool,
    pub url_entry_visible: bool,
    /// Displayed slider value in milliseconds.
    pub progress_ms: u64,
    /// Slider upper bound in milliseconds (media duration once ready).
    pub progress_max_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn prepared_states() {
        assert!(!SessionState::Idle.is_prepared());
        assert!(!SessionState::Loading.is_prepared());
        assert!(SessionState::Ready.is_prepared());
        assert!(SessionState::Playing.is_prepared());
        assert!(SessionState::Paused.is_prepared());
        assert!(!SessionState::Stopped.is_prepared());
    }

    #[test]
    fn active_states_include_loading() {
        assert!(SessionState::Loading.is_active());
        assert!(!SessionState::Stopped.is_active());
        assert!(!SessionState::Idle.is_active());
    }

    #[test]
    fn session_ids_increase() {
        let first = SessionId::first();
        let second = first.next();
        assert_ne!(first, second);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn default_ui_hides_everything() {
        let ui = UiState::default();
        assert!(!ui.controls_visible);
        assert!(!ui.video_surface_visible);
        assert!(!ui.url_entry_visible);
        assert_eq!(ui.progress_ms, 0);
    }
}
