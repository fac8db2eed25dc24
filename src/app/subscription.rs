// SPDX-License-Identifier: MPL-2.0
//! Event and timer subscriptions.

use super::Message;
use crate::config::FRAME_REFRESH_INTERVAL_MS;
use crate::playback::TickerHandle;
use iced::{event, time, Subscription};
use std::time::Duration;

/// Window close requests, so playback can be torn down before exit.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, window_id| match event {
        event::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        _ => None,
    })
}

/// Progress ticks, only while the controller holds a ticker.
///
/// The subscription is keyed by the ticker id: a new chain replaces the old
/// timer, and ticks still in flight carry the old id and are ignored.
pub fn create_progress_subscription(ticker: Option<&TickerHandle>) -> Subscription<Message> {
    match ticker {
        Some(handle) => time::every(handle.interval())
            .with(handle.id())
            .map(|(id, _instant)| Message::ProgressTick(id)),
        None => Subscription::none(),
    }
}

/// Frame polling while the video surface is shown.
pub fn create_frame_subscription(surface_visible: bool) -> Subscription<Message> {
    if surface_visible {
        time::every(Duration::from_millis(FRAME_REFRESH_INTERVAL_MS)).map(|_| Message::FrameTick)
    } else {
        Subscription::none()
    }
}

/// Toast auto-dismiss checks while any toast is pending.
pub fn create_notification_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(Duration::from_millis(250)).map(|_| Message::NotificationTick)
    } else {
        Subscription::none()
    }
}
