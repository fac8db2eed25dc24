// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.

// ==========================================================================
// Progress Ticker
// ==========================================================================

/// Period of the progress ticker sampling the backend position (ms).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Shortest accepted ticker period (ms).
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Longest accepted ticker period (ms).
pub const MAX_TICK_INTERVAL_MS: u64 = 5_000;

// ==========================================================================
// Volume
// ==========================================================================

/// Default playback volume (1.0 = unity gain).
pub const DEFAULT_VOLUME: f32 = 0.8;

pub const MIN_VOLUME: f32 = 0.0;

pub const MAX_VOLUME: f32 = 1.5;

// ==========================================================================
// Video surface
// ==========================================================================

/// Interval at which the view pulls the latest decoded frame (ms).
pub const FRAME_REFRESH_INTERVAL_MS: u64 = 33;
