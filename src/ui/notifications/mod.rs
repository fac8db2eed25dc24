// SPDX-License-Identifier: MPL-2.0
//! Transient toast notices.
//!
//! - [`notification`]: a `Notification` with its severity and i18n key
//! - [`manager`]: queueing and auto-dismiss
//! - [`toast`]: rendering, bottom-right overlay
//!
//! Info and warning toasts dismiss themselves; errors stay until closed.
//! At most three are visible, the rest wait in a queue.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
