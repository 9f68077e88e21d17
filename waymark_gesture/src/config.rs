// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-supplied gesture constants.

use kurbo::Vec2;

/// Default touch slop in logical pixels.
///
/// Motion shorter than this is treated as jitter rather than a drag. Matches
/// the common platform default of 8 logical pixels.
pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;

/// Default time a pointer has to stay down before a long press is detected.
pub const DEFAULT_LONG_PRESS_TIMEOUT_MILLIS: u64 = 500;

/// Gesture thresholds supplied by the platform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewConfiguration {
    /// Minimum cumulative motion, in logical pixels, before a drag is recognized.
    pub touch_slop: f64,
    /// Time, in milliseconds, a pointer has to stay down to start a long-press drag.
    pub long_press_timeout_millis: u64,
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            long_press_timeout_millis: DEFAULT_LONG_PRESS_TIMEOUT_MILLIS,
        }
    }
}

impl ViewConfiguration {
    /// Create a configuration, rejecting a touch slop that is negative or not finite.
    pub fn new(touch_slop: f64, long_press_timeout_millis: u64) -> Result<Self, GestureConfigError> {
        if !touch_slop.is_finite() || touch_slop < 0.0 {
            return Err(GestureConfigError::InvalidTouchSlop(touch_slop));
        }
        Ok(Self {
            touch_slop,
            long_press_timeout_millis,
        })
    }
}

/// Errors from [`ViewConfiguration::new`].
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum GestureConfigError {
    /// Touch slop must be finite and non-negative.
    #[error("touch slop must be finite and non-negative, got {0}")]
    InvalidTouchSlop(f64),
}

/// Axis a recognizer is locked to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left/right motion only.
    Horizontal,
    /// Up/down motion only.
    Vertical,
}

impl Orientation {
    /// The component of `v` along this axis.
    pub fn component(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// A vector of length `amount` along this axis.
    pub fn vector(self, amount: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(amount, 0.0),
            Self::Vertical => Vec2::new(0.0, amount),
        }
    }
}
