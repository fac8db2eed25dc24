// SPDX-License-Identifier: MPL-2.0
//! Application root: wires the playback controller, the UI components and
//! the persisted settings into an Iced application.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::playback::{Controller, FfmpegBackendFactory, VolumeSettings};
use crate::ui::notifications::{self, Notification};
use crate::ui::surface::VideoSurface;
use crate::ui::url_entry;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

pub const WINDOW_DEFAULT_WIDTH: f32 = 960.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 600.0;
pub const MIN_WINDOW_WIDTH: f32 = 560.0;
pub const MIN_WINDOW_HEIGHT: f32 = 360.0;

/// Root application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    controller: Controller<FfmpegBackendFactory>,
    url_entry: url_entry::State,
    surface: VideoSurface,
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.controller.state())
            .field("session", &self.controller.session_source())
            .finish_non_exhaustive()
    }
}

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        // Close is handled in `update` so playback is torn down first.
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced calls `boot` through `Fn`; the flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads settings and translations, then submits the startup source if any.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let mut app = Self::with_config(flags.lang, config);

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }

        let task = match flags.source {
            Some(source) => {
                let effect = app.controller.load_url(&source);
                update::apply_effect(&mut app.notifications, &mut app.surface, effect)
            }
            None => Task::none(),
        };

        (app, task)
    }

    fn with_config(lang: Option<String>, config: Config) -> Self {
        let i18n = I18n::new(lang, &config);
        let volume = VolumeSettings {
            volume: config.playback.volume(),
            muted: config.playback.muted(),
        };
        let controller = Controller::new(
            FfmpegBackendFactory,
            config.playback.tick_interval(),
            volume,
        );

        Self {
            i18n,
            config,
            controller,
            url_entry: url_entry::State::default(),
            surface: VideoSurface::new(),
            notifications: notifications::Manager::new(),
        }
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match self.controller.session_source() {
            Some(source) => format!("{source} - {app_name}"),
            None => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_progress_subscription(self.controller.ticker()),
            subscription::create_frame_subscription(self.controller.ui().video_surface_visible),
            subscription::create_notification_subscription(
                self.notifications.has_notifications(),
            ),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            controller: &mut self.controller,
            config: &mut self.config,
            url_entry: &mut self.url_entry,
            surface: &mut self.surface,
            notifications: &mut self.notifications,
        };

        match message {
            Message::OpenFileDialog => update::handle_open_file_dialog(
                self.i18n.tr("open-dialog-title"),
                update::DialogFilters {
                    media: self.i18n.tr("open-dialog-filter-media"),
                    audio: self.i18n.tr("open-dialog-filter-audio"),
                    video: self.i18n.tr("open-dialog-filter-video"),
                },
            ),
            Message::OpenFileDialogResult(path) => {
                update::handle_open_file_dialog_result(&mut ctx, path)
            }
            Message::ShowUrlEntry => {
                ctx.controller.show_url_entry();
                Task::none()
            }
            Message::UrlEntry(message) => update::handle_url_entry(&mut ctx, message),
            Message::Controls(message) => update::handle_controls(&mut ctx, message),
            Message::PlaybackReady(session, result) => {
                update::handle_playback_ready(&mut ctx, session, result)
            }
            Message::ProgressTick(id) => {
                ctx.controller.tick(id);
                Task::none()
            }
            Message::FrameTick => {
                ctx.surface.update(ctx.controller.latest_frame());
                Task::none()
            }
            Message::Notification(message) => {
                ctx.notifications.handle_message(&message);
                Task::none()
            }
            Message::NotificationTick => {
                ctx.notifications.tick();
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                tracing::debug!(?id, "window close requested");
                ctx.controller.shutdown();
                iced::exit()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            ui: self.controller.ui(),
            state: self.controller.state(),
            source: self.controller.session_source(),
            muted: self.controller.volume().muted,
            url_entry: &self.url_entry,
            surface: &self.surface,
            notifications: &self.notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::SessionState;
    use crate::ui::url_entry::Message as UrlMessage;
    use unic_langid::langid;

    fn app() -> App {
        App::with_config(Some("en-US".to_string()), Config::default())
    }

    #[test]
    fn title_shows_app_name_when_idle() {
        assert_eq!(app().title(), "IcedDeck");
    }

    #[test]
    fn cli_language_selects_locale() {
        let app = App::with_config(Some("fr".to_string()), Config::default());
        assert_eq!(app.i18n.current_locale(), &langid!("fr"));
    }

    #[test]
    fn config_volume_reaches_controller() {
        let mut config = Config::default();
        config.playback.muted = Some(true);
        config.playback.volume = Some(0.5);
        let app = App::with_config(None, config);
        assert!(app.controller.volume().muted);
        assert!((app.controller.volume().volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn url_button_reveals_entry() {
        let mut app = app();
        assert!(!app.controller.ui().url_entry_visible);
        let _ = app.update(Message::ShowUrlEntry);
        assert!(app.controller.ui().url_entry_visible);
    }

    #[test]
    fn unsupported_url_shows_notice_and_stays_idle() {
        let mut app = app();
        let _ = app.update(Message::UrlEntry(UrlMessage::InputChanged(
            "https://host/clip.avi".into(),
        )));
        let _ = app.update(Message::UrlEntry(UrlMessage::Submitted));

        assert_eq!(app.controller.state(), SessionState::Idle);
        assert_eq!(
            app.notifications.visible().next().map(Notification::message_key),
            Some("notification-unsupported-media-type")
        );
    }

    #[test]
    fn blank_url_is_ignored_silently() {
        let mut app = app();
        let _ = app.update(Message::UrlEntry(UrlMessage::Submitted));
        assert_eq!(app.controller.state(), SessionState::Idle);
        assert!(!app.notifications.has_notifications());
    }

    #[test]
    fn picked_file_without_media_type_shows_notice() {
        let mut app = app();
        let _ = app.update(Message::OpenFileDialogResult(Some("/tmp/notes.txt".into())));

        assert_eq!(app.controller.state(), SessionState::Idle);
        assert_eq!(
            app.notifications.visible().next().map(Notification::message_key),
            Some("notification-undefined-file-type")
        );
    }

    #[test]
    fn cancelled_dialog_changes_nothing() {
        let mut app = app();
        let _ = app.update(Message::OpenFileDialogResult(None));
        assert_eq!(app.controller.state(), SessionState::Idle);
        assert!(!app.notifications.has_notifications());
    }

    #[test]
    fn no_progress_subscription_without_session() {
        let app = app();
        assert!(app.controller.ticker().is_none());
        assert!(!app.controller.ui().video_surface_visible);
    }
}
