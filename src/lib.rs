// SPDX-License-Identifier: MPL-2.0
//! `iced_deck` is a minimal audio/video player built with the Iced GUI
//! framework and FFmpeg.
//!
//! Media is picked from disk or typed as a URL, routed to a video or audio
//! backend, and driven through a small playback state machine with a
//! periodic progress ticker.

#![doc(html_root_url = "https://docs.rs/iced_deck/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod media;
pub mod playback;
pub mod ui;
