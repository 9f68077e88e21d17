// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning raw platform samples into [`PointerEvent`]s with previous-state fields.

use hashbrown::HashMap;
use kurbo::Point;

use crate::pointer::{ConsumedFlags, PointerEvent, PointerId, PointerInputChange};

/// One raw pointer sample as reported by the platform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Pointer identifier.
    pub id: PointerId,
    /// Timestamp in milliseconds.
    pub uptime_millis: u64,
    /// Position.
    pub position: Point,
    /// Whether the pointer is pressed.
    pub pressed: bool,
}

/// Remembers the last sample of every pressed pointer and pairs it with the next one.
///
/// ```
/// use kurbo::Point;
/// use waymark_gesture::{ChangeProducer, PointerId, PointerSample};
///
/// let mut producer = ChangeProducer::new();
/// let sample = |t, y, pressed| PointerSample {
///     id: PointerId(1),
///     uptime_millis: t,
///     position: Point::new(0.0, y),
///     pressed,
/// };
///
/// let down = producer.produce(&[sample(0, 0.0, true)]);
/// assert!(down.changes[0].changed_to_down());
///
/// let moved = producer.produce(&[sample(16, 5.0, true)]);
/// assert_eq!(moved.changes[0].previous_position, Point::ZERO);
///
/// let up = producer.produce(&[sample(32, 5.0, false)]);
/// assert!(up.changes[0].changed_to_up());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ChangeProducer {
    previous: HashMap<PointerId, PointerSample>,
}

impl ChangeProducer {
    /// Create a producer that has seen no pointers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from `samples`, filling each change's previous state.
    ///
    /// A pointer not seen before (or released earlier) starts from itself,
    /// unpressed. Released pointers are forgotten after this batch.
    pub fn produce(&mut self, samples: &[PointerSample]) -> PointerEvent {
        let changes = samples.iter().map(|sample| {
            let previous = match self.previous.get(&sample.id) {
                Some(previous) => *previous,
                None => PointerSample {
                    pressed: false,
                    ..*sample
                },
            };
            if sample.pressed {
                self.previous.insert(sample.id, *sample);
            } else {
                self.previous.remove(&sample.id);
            }
            PointerInputChange {
                id: sample.id,
                uptime_millis: sample.uptime_millis,
                position: sample.position,
                pressed: sample.pressed,
                previous_uptime_millis: previous.uptime_millis,
                previous_position: previous.position,
                previous_pressed: previous.pressed,
                consumed: ConsumedFlags::empty(),
            }
        });
        PointerEvent::new(changes)
    }

    /// Number of pointers currently tracked as pressed.
    pub fn pressed_count(&self) -> usize {
        self.previous.len()
    }

    /// Forget every pointer, e.g. after the platform cancels input.
    pub fn reset(&mut self) {
        if !self.previous.is_empty() {
            log::debug!("dropping {} tracked pointer(s)", self.previous.len());
        }
        self.previous.clear();
    }
}
