// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags.

use crate::playback::{PrepareResult, SessionId, TickerId};
use crate::ui::controls;
use crate::ui::notifications;
use crate::ui::url_entry;
use std::path::PathBuf;

/// Messages consumed by `App::update`. Component messages are forwarded
/// through their own variants.
#[derive(Debug, Clone)]
pub enum Message {
    /// "Open" button: show the file picker.
    OpenFileDialog,
    OpenFileDialogResult(Option<PathBuf>),
    /// "URL" button: reveal the URL entry.
    ShowUrlEntry,
    UrlEntry(url_entry::Message),
    Controls(controls::Message),
    /// A backend finished preparing the source of `SessionId`.
    PlaybackReady(SessionId, PrepareResult),
    /// Periodic progress tick of one ticker chain.
    ProgressTick(TickerId),
    /// Poll for a new video frame.
    FrameTick,
    Notification(notifications::NotificationMessage),
    /// Auto-dismiss check for toasts.
    NotificationTick,
    WindowCloseRequested(iced::window::Id),
}

/// Startup options from the command line.
#[derive(Debug, Default)]
pub struct Flags {
    /// Locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// URL or path to load on startup, routed like URL entry text.
    pub source: Option<String>,
}
