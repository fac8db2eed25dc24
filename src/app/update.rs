// SPDX-License-Identifier: MPL-2.0
//! Message handlers.
//!
//! Each handler borrows what it needs through [`UpdateContext`] and returns
//! the follow-up task.

use super::Message;
use crate::config::{self, Config};
use crate::media::{self, extensions, MediaSource};
use crate::playback::{
    BackendFactory, Controller, Effect, PrepareResult, SeekOrigin, SessionId,
};
use crate::ui::controls;
use crate::ui::notifications::{self, Notification};
use crate::ui::surface::VideoSurface;
use crate::ui::url_entry;
use iced::Task;
use std::path::PathBuf;

/// Mutable application state handed to the handlers.
pub struct UpdateContext<'a, F: BackendFactory> {
    pub controller: &'a mut Controller<F>,
    pub config: &'a mut Config,
    pub url_entry: &'a mut url_entry::State,
    pub surface: &'a mut VideoSurface,
    pub notifications: &'a mut notifications::Manager,
}

/// Turns a controller effect into a notice or an async readiness task.
pub fn apply_effect(
    notifications: &mut notifications::Manager,
    surface: &mut VideoSurface,
    effect: Effect,
) -> Task<Message> {
    match effect {
        Effect::None => Task::none(),
        Effect::Notify(notice) => {
            notifications.push(Notification::info(notice.i18n_key()));
            Task::none()
        }
        Effect::AwaitReady {
            session,
            preparation,
        } => {
            // A new session never shows the previous session's last frame.
            surface.clear();
            Task::perform(preparation.wait(), move |result| {
                Message::PlaybackReady(session, result)
            })
        }
    }
}

/// Opens the platform file picker, restricted to the supported media.
pub fn handle_open_file_dialog(title: String, filters: DialogFilters) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(title)
                .add_filter(filters.media, extensions::ALL_MEDIA_EXTENSIONS)
                .add_filter(filters.audio, extensions::AUDIO_EXTENSIONS)
                .add_filter(filters.video, extensions::VIDEO_EXTENSIONS)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}

/// Localized names of the picker's filters.
#[derive(Debug, Clone)]
pub struct DialogFilters {
    pub media: String,
    pub audio: String,
    pub video: String,
}

/// Routes a picked file by its MIME type.
pub fn handle_open_file_dialog_result<F: BackendFactory>(
    ctx: &mut UpdateContext<'_, F>,
    path: Option<PathBuf>,
) -> Task<Message> {
    let Some(path) = path else {
        // Cancelled.
        return Task::none();
    };

    let mime = media::guess_mime(&path);
    let effect = ctx
        .controller
        .open_picked(MediaSource::File(path), mime.as_deref());
    apply_effect(ctx.notifications, ctx.surface, effect)
}

pub fn handle_url_entry<F: BackendFactory>(
    ctx: &mut UpdateContext<'_, F>,
    message: url_entry::Message,
) -> Task<Message> {
    match ctx.url_entry.update(message) {
        Some(text) => {
            let effect = ctx.controller.load_url(&text);
            apply_effect(ctx.notifications, ctx.surface, effect)
        }
        None => Task::none(),
    }
}

/// Failures are only logged by the controller; the session stays loading.
pub fn handle_playback_ready<F: BackendFactory>(
    ctx: &mut UpdateContext<'_, F>,
    session: SessionId,
    result: PrepareResult,
) -> Task<Message> {
    ctx.controller.on_ready(session, result);
    Task::none()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn handle_controls<F: BackendFactory>(
    ctx: &mut UpdateContext<'_, F>,
    message: controls::Message,
) -> Task<Message> {
    match message {
        controls::Message::TogglePlayback => ctx.controller.toggle(),
        controls::Message::Stop => {
            ctx.controller.stop();
            ctx.surface.clear();
        }
        controls::Message::SeekChanged(value) => {
            if !ctx.controller.ui().user_seeking {
                ctx.controller.seek_drag_begin();
            }
            ctx.controller
                .seek(value.max(0.0).round() as u64, SeekOrigin::User);
        }
        controls::Message::SeekReleased => ctx.controller.seek_drag_end(),
        controls::Message::ToggleMute => toggle_mute(ctx),
    }
    Task::none()
}

/// Flips mute on the live backend and persists it.
fn toggle_mute<F: BackendFactory>(ctx: &mut UpdateContext<'_, F>) {
    let muted = !ctx.controller.volume().muted;
    ctx.controller.set_muted(muted);
    ctx.config.playback.muted = Some(muted);

    if let Err(err) = config::save(ctx.config) {
        tracing::warn!(%err, "failed to save settings");
        ctx.notifications
            .push(Notification::warning("notification-config-save-error"));
    }
}
