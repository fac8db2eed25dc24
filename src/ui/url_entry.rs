// SPDX-License-Identifier: MPL-2.0
//! Text entry for a media URL, revealed by the "URL" button.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use iced::widget::{button, row, text, text_input};
use iced::{Element, Length};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    InputChanged(String),
    /// Enter pressed or "Load" clicked.
    Submitted,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    value: String,
}

impl State {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Applies `message`; returns the text to load on submit.
    pub fn update(&mut self, message: Message) -> Option<String> {
        match message {
            Message::InputChanged(value) => {
                self.value = value;
                None
            }
            Message::Submitted => Some(self.value.clone()),
        }
    }

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let input = text_input(&i18n.tr("url-placeholder"), &self.value)
            .on_input(Message::InputChanged)
            .on_submit(Message::Submitted)
            .size(typography::BODY)
            .padding(spacing::XS)
            .width(Length::Fixed(sizing::URL_ENTRY_WIDTH));

        let load = button(text(i18n.tr("button-load-url")).size(typography::BODY))
            .on_press(Message::Submitted)
            .padding(spacing::XS)
            .height(Length::Fixed(sizing::BUTTON_HEIGHT));

        row![input, load]
            .spacing(spacing::XS)
            .align_y(iced::Alignment::Center)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_returns_current_text() {
        let mut state = State::default();
        assert_eq!(
            state.update(Message::InputChanged("https://host/a.mp3".into())),
            None
        );
        assert_eq!(state.value(), "https://host/a.mp3");
        assert_eq!(
            state.update(Message::Submitted),
            Some("https://host/a.mp3".to_string())
        );
    }

    #[test]
    fn submit_keeps_text_for_a_retry() {
        let mut state = State::default();
        state.update(Message::InputChanged("clip.avi".into()));
        state.update(Message::Submitted);
        assert_eq!(state.value(), "clip.avi");
    }
}
