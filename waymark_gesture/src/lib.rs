// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Gesture: pointer-input passes and drag gesture recognition.
//!
//! The crate is organized bottom-up:
//!
//! - [`PointerInputChange`] / [`PointerEvent`]: one batch of pointer
//!   snapshots with their previous state and [`ConsumedFlags`].
//!   [`ChangeProducer`] builds these from raw [`PointerSample`]s.
//! - [`dispatch`]: delivers a batch to a root-to-leaf handler path in three
//!   [`PointerEventPass`]es. Handlers implement [`PointerInputHandler`].
//! - [`TouchSlopDetector`] and [`DragTracker`]: the two halves of a drag,
//!   written as state machines fed once per pass.
//! - [`DragGestureDetector`] (free, vertical or horizontal) and
//!   [`LongPressDragGestureDetector`]: complete recognizers reporting to a
//!   [`DragHandler`].
//!
//! Recognizers never share state. They arbitrate only through consumption:
//! the first to consume a change's position change owns the gesture, and
//! everyone who sees the consumed change afterwards backs off.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use waymark_gesture::{
//!     ChangeProducer, DragGestureDetector, DragHandler, PointerId, PointerInputChange,
//!     PointerSample, ViewConfiguration, dispatch,
//! };
//!
//! #[derive(Default)]
//! struct Scroll {
//!     offset: f64,
//! }
//!
//! impl DragHandler for Scroll {
//!     fn on_drag(&mut self, _: &PointerInputChange, amount: Vec2) {
//!         self.offset -= amount.y;
//!     }
//! }
//!
//! let mut list = DragGestureDetector::vertical(ViewConfiguration::default(), Scroll::default());
//! let mut producer = ChangeProducer::new();
//! let bounds = Size::new(320.0, 480.0);
//!
//! for (t, y, pressed) in [(0, 200.0, true), (16, 180.0, true), (32, 150.0, true), (48, 150.0, false)] {
//!     let mut event = producer.produce(&[PointerSample {
//!         id: PointerId(0),
//!         uptime_millis: t,
//!         position: Point::new(100.0, y),
//!         pressed,
//!     }]);
//!     dispatch(&mut event, &mut [(&mut list, bounds)]);
//! }
//!
//! // 50px of travel, minus the 8px touch slop.
//! assert_eq!(list.handler().offset, 42.0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod detector;
pub mod dispatch;
mod drag;
mod long_press;
mod pointer;
mod producer;
mod slop;

pub use config::{
    DEFAULT_LONG_PRESS_TIMEOUT_MILLIS, DEFAULT_TOUCH_SLOP, GestureConfigError, Orientation,
    ViewConfiguration,
};
pub use detector::{DragGestureDetector, DragHandler};
pub use dispatch::{PointerInputHandler, dispatch};
pub use drag::{DragResult, DragTracker, first_down};
pub use long_press::LongPressDragGestureDetector;
pub use pointer::{ConsumedFlags, PointerEvent, PointerEventPass, PointerId, PointerInputChange};
pub use producer::{ChangeProducer, PointerSample};
pub use slop::{SlopResult, SlopState, TouchSlopDetector};
