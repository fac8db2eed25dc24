// SPDX-License-Identifier: MPL-2.0
//! Video surface: shows the latest decoded frame, letterboxed on black.

use crate::playback::DecodedFrame;
use crate::ui::styles;
use iced::widget::{container, image, Space};
use iced::{ContentFit, Element, Length};
use std::sync::Arc;

/// Caches the image handle of the last frame so unchanged frames are not
/// re-uploaded.
#[derive(Debug, Default)]
pub struct VideoSurface {
    handle: Option<image::Handle>,
    sequence: Option<u64>,
}

impl VideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes `frame` if it differs from the one on screen.
    /// Returns whether the displayed image changed.
    pub fn update(&mut self, frame: Option<DecodedFrame>) -> bool {
        let Some(frame) = frame else {
            return false;
        };
        if self.sequence == Some(frame.sequence) {
            return false;
        }

        let data = Arc::try_unwrap(frame.rgba_data).unwrap_or_else(|shared| (*shared).clone());
        self.handle = Some(image::Handle::from_rgba(frame.width, frame.height, data));
        self.sequence = Some(frame.sequence);
        true
    }

    pub fn clear(&mut self) {
        self.handle = None;
        self.sequence = None;
    }

    pub fn has_frame(&self) -> bool {
        self.handle.is_some()
    }

    pub fn view<'a, Message: 'a>(&self) -> Element<'a, Message> {
        let content: Element<'a, Message> = match &self.handle {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => Space::new().width(Length::Fill).height(Length::Fill).into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(styles::video_backdrop)
            .into()
    }
}
