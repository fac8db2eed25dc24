// SPDX-License-Identifier: MPL-2.0
//! Playback control bar: toggle, stop, seek bar, time label and mute.

use crate::i18n::fluent::I18n;
use crate::playback::UiState;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, container, row, slider, text};
use iced::{Element, Length};

/// Slider step in milliseconds.
const SLIDER_STEP_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    TogglePlayback,
    Stop,
    /// Seek bar moved by the user, in milliseconds.
    SeekChanged(f64),
    /// Seek bar released.
    SeekReleased,
    ToggleMute,
}

/// What the bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsState {
    pub paused: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub muted: bool,
    /// Session is prepared; toggle and seek have an effect.
    pub enabled: bool,
}

impl ControlsState {
    pub fn new(ui: &UiState, muted: bool, enabled: bool) -> Self {
        Self {
            paused: ui.paused,
            position_ms: ui.progress_ms,
            duration_ms: ui.progress_max_ms,
            muted,
            enabled,
        }
    }
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

#[allow(clippy::cast_precision_loss)]
pub fn view<'a>(ctx: ViewContext<'a>, state: ControlsState) -> Element<'a, Message> {
    let toggle_label = if state.paused {
        ctx.i18n.tr("button-play")
    } else {
        ctx.i18n.tr("button-pause")
    };
    let toggle = control_button(toggle_label, state.enabled.then_some(Message::TogglePlayback));
    let stop = control_button(ctx.i18n.tr("button-stop"), Some(Message::Stop));

    // An empty range would make the slider divide by zero.
    let max = state.duration_ms.max(1) as f64;
    let position = (state.position_ms as f64).min(max);
    // Release is always wired so a drag started while loading still ends.
    let seek_bar = slider(0.0..=max, position, Message::SeekChanged)
        .on_release(Message::SeekReleased)
        .step(SLIDER_STEP_MS)
        .width(Length::Fill);

    let time_label = text(format!(
        "{} / {}",
        format_time(state.position_ms),
        format_time(state.duration_ms)
    ))
    .size(typography::CAPTION)
    .width(Length::Fixed(sizing::TIME_LABEL_WIDTH));

    let mute_label = if state.muted {
        ctx.i18n.tr("button-unmute")
    } else {
        ctx.i18n.tr("button-mute")
    };
    let mut mute = button(text(mute_label).size(typography::BODY))
        .on_press(Message::ToggleMute)
        .padding(spacing::XS)
        .width(Length::Fixed(sizing::CONTROL_BUTTON_WIDTH))
        .height(Length::Fixed(sizing::BUTTON_HEIGHT));
    if state.muted {
        mute = mute.style(styles::selected);
    }

    container(
        row![toggle, stop, seek_bar, time_label, mute]
            .spacing(spacing::XS)
            .padding(spacing::XS)
            .align_y(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .style(styles::control_bar)
    .into()
}

fn control_button<'a>(label: String, on_press: Option<Message>) -> Element<'a, Message> {
    button(text(label).size(typography::BODY))
        .on_press_maybe(on_press)
        .padding(spacing::XS)
        .width(Length::Fixed(sizing::CONTROL_BUTTON_WIDTH))
        .height(Length::Fixed(sizing::BUTTON_HEIGHT))
        .into()
}

/// Formats milliseconds as `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn format_time(position_ms: u64) -> String {
    let total_secs = position_ms / 1_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_handles_zero() {
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn format_time_truncates_milliseconds() {
        assert_eq!(format_time(45_999), "00:45");
    }

    #[test]
    fn format_time_handles_minutes() {
        assert_eq!(format_time(125_000), "02:05");
    }

    #[test]
    fn format_time_handles_hours() {
        assert_eq!(format_time(3_665_000), "01:01:05");
    }

    #[test]
    fn controls_state_mirrors_ui_state() {
        let ui = UiState {
            paused: true,
            progress_ms: 12_000,
            progress_max_ms: 60_000,
            ..UiState::default()
        };
        let state = ControlsState::new(&ui, true, true);
        assert!(state.paused);
        assert!(state.muted);
        assert_eq!(state.position_ms, 12_000);
        assert_eq!(state.duration_ms, 60_000);
    }
}
