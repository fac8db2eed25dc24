// SPDX-License-Identifier: MPL-2.0
//! Wall-clock playback position shared between a backend handle and its
//! decode thread.
//!
//! The decode thread paces output against this clock; the UI thread reads
//! it to answer position queries. All fields are atomics, so neither side
//! ever blocks the other.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Reference instant for storing `Instant`s as atomic microseconds.
static REFERENCE_INSTANT: OnceLock<Instant> = OnceLock::new();

#[allow(clippy::cast_possible_truncation)]
fn instant_to_us(instant: Instant) -> u64 {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    instant.duration_since(*reference).as_micros() as u64
}

fn us_to_instant(us: u64) -> Instant {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    *reference + Duration::from_micros(us)
}

/// Tolerance within which a frame counts as on time.
pub const FRAME_TOLERANCE_SECS: f64 = 0.04;

/// What to do with a decoded frame given the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAction {
    Display,
    /// Frame is early; show it after this delay.
    Wait(Duration),
    /// Frame is late; drop it.
    Skip,
}

#[derive(Debug, Default)]
pub struct PlaybackClock {
    /// Media position at the anchor, in microseconds.
    anchor_pos_us: AtomicU64,
    /// Wall time of the anchor, as microseconds since `REFERENCE_INSTANT`.
    anchor_time_us: AtomicU64,
    /// Position never reported beyond this (0 = unbounded).
    limit_us: AtomicU64,
    running: AtomicBool,
}

impl PlaybackClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps reported positions at the media duration.
    pub fn set_limit_ms(&self, limit_ms: u64) {
        self.limit_us
            .store(limit_ms.saturating_mul(1_000), Ordering::SeqCst);
    }

    /// Starts advancing from the current position.
    pub fn resume(&self) {
        if self.running.load(Ordering::SeqCst) {
            return;
        }
        self.anchor_time_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    /// Freezes the clock at the current position.
    pub fn pause(&self) {
        let current = self.current_us();
        self.running.store(false, Ordering::SeqCst);
        self.anchor_pos_us.store(current, Ordering::SeqCst);
    }

    /// Jumps to `position_ms`, keeping the running state.
    pub fn seek_ms(&self, position_ms: u64) {
        self.anchor_pos_us
            .store(position_ms.saturating_mul(1_000), Ordering::SeqCst);
        self.anchor_time_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn current_us(&self) -> u64 {
        let anchor_pos = self.anchor_pos_us.load(Ordering::SeqCst);
        let position = if self.running.load(Ordering::SeqCst) {
            let anchor_time = us_to_instant(self.anchor_time_us.load(Ordering::SeqCst));
            anchor_pos + anchor_time.elapsed().as_micros() as u64
        } else {
            anchor_pos
        };
        match self.limit_us.load(Ordering::SeqCst) {
            0 => position,
            limit => position.min(limit),
        }
    }

    #[must_use]
    pub fn current_ms(&self) -> u64 {
        self.current_us() / 1_000
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn current_secs(&self) -> f64 {
        self.current_us() as f64 / 1_000_000.0
    }

    /// Decides whether a frame with presentation time `pts_secs` is due.
    #[must_use]
    pub fn frame_action(&self, pts_secs: f64) -> FrameAction {
        let diff = pts_secs - self.current_secs();
        if diff.abs() <= FRAME_TOLERANCE_SECS {
            FrameAction::Display
        } else if diff > 0.0 {
            FrameAction::Wait(Duration::from_secs_f64(diff))
        } else {
            FrameAction::Skip
        }
    }
}
