// SPDX-License-Identifier: MPL-2.0
//! Shared widget styles.

use crate::ui::design_tokens::{
    border,
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::{button, container};
use iced::{Background, Border, Theme};

/// Highlighted toggle button (e.g. muted).
pub fn selected(theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered => palette::PRIMARY_500,
        button::Status::Disabled if matches!(theme, Theme::Light) => palette::GRAY_200,
        button::Status::Disabled => palette::GRAY_700,
        button::Status::Active | button::Status::Pressed => palette::PRIMARY_700,
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: WHITE,
        border: Border {
            color: palette::PRIMARY_500,
            width: border::WIDTH_SM,
            radius: radius::SM.into(),
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

/// Black backdrop behind the video surface.
pub fn video_backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BLACK)),
        ..Default::default()
    }
}

/// Bar holding the playback controls.
pub fn control_bar(theme: &Theme) -> container::Style {
    let weak = theme.extended_palette().background.weak;
    container::Style {
        background: Some(Background::Color(weak.color)),
        text_color: Some(weak.text),
        ..Default::default()
    }
}
