// SPDX-License-Identifier: MPL-2.0
//! Layout: top bar, media area, control bar, toast overlay.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::media::MediaSource;
use crate::playback::{SessionState, UiState};
use crate::ui::controls::{self, ControlsState};
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::notifications::{self, Toast};
use crate::ui::surface::VideoSurface;
use crate::ui::url_entry;
use iced::widget::{button, column, container, row, stack, text, Column};
use iced::{Element, Length};

/// Everything the view reads.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub ui: &'a UiState,
    pub state: SessionState,
    pub source: Option<&'a MediaSource>,
    pub muted: bool,
    pub url_entry: &'a url_entry::State,
    pub surface: &'a VideoSurface,
    pub notifications: &'a notifications::Manager,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let mut layout: Column<'_, Message> = column![top_bar(&ctx), media_area(&ctx)]
        .width(Length::Fill)
        .height(Length::Fill);

    if ctx.ui.controls_visible {
        let state = ControlsState::new(ctx.ui, ctx.muted, ctx.state.is_prepared());
        layout = layout.push(
            controls::view(controls::ViewContext { i18n: ctx.i18n }, state).map(Message::Controls),
        );
    }

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);

    stack![layout, toasts]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn top_bar<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let open = button(text(ctx.i18n.tr("button-open")).size(typography::BODY))
        .on_press(Message::OpenFileDialog)
        .padding(spacing::XS)
        .height(Length::Fixed(sizing::BUTTON_HEIGHT));
    let url = button(text(ctx.i18n.tr("button-url")).size(typography::BODY))
        .on_press(Message::ShowUrlEntry)
        .padding(spacing::XS)
        .height(Length::Fixed(sizing::BUTTON_HEIGHT));

    let mut bar = row![open, url]
        .spacing(spacing::XS)
        .padding(spacing::XS)
        .align_y(iced::Alignment::Center);

    if ctx.ui.url_entry_visible {
        bar = bar.push(ctx.url_entry.view(ctx.i18n).map(Message::UrlEntry));
    }

    container(bar).width(Length::Fill).into()
}

fn media_area<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    if ctx.ui.video_surface_visible {
        return ctx.surface.view();
    }

    let caption = match (ctx.state, ctx.source) {
        (SessionState::Loading, _) => ctx.i18n.tr("loading-label"),
        (state, Some(source)) if state.is_active() => source_label(source),
        _ => ctx.i18n.tr("empty-state-hint"),
    };

    container(text(caption).size(typography::TITLE_MD))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .padding(spacing::LG)
        .into()
}

/// File name for local sources, the full location for URLs.
fn source_label(source: &MediaSource) -> String {
    match source {
        MediaSource::File(path) => path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned()),
        MediaSource::Url(url) => url.clone(),
    }
}
