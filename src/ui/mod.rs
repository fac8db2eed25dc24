// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern; the
//! application maps their messages into its own.
//!
//! - [`controls`] - toggle, stop, seek bar, time label, mute
//! - [`url_entry`] - URL text entry
//! - [`surface`] - video surface
//! - [`notifications`] - toast notices
//! - [`design_tokens`], [`styles`] - visual constants and shared styles

pub mod controls;
pub mod design_tokens;
pub mod notifications;
pub mod styles;
pub mod surface;
pub mod url_entry;
