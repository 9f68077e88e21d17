// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input data model: per-pointer changes, consumption, event batches and passes.
//!
//! A [`PointerInputChange`] is one pointer's snapshot in a batch together with
//! its previous snapshot. Recognizers arbitrate by *consuming* parts of a
//! change ([`ConsumedFlags`]); consumption is visible to every recognizer that
//! looks at the same change later in the same or a later [`PointerEventPass`].
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use waymark_gesture::{PointerId, PointerInputChange};
//!
//! let down = PointerInputChange::down(PointerId(1), 0, Point::new(5.0, 5.0));
//! assert!(down.changed_to_down());
//!
//! let mut moved = down.moved_by(16, Vec2::new(3.0, 4.0));
//! assert_eq!(moved.position_change(), Vec2::new(3.0, 4.0));
//!
//! // Once a recognizer claims the motion, others see no position change.
//! moved.consume_position_change();
//! assert_eq!(moved.position_change(), Vec2::ZERO);
//! assert_eq!(moved.position_change_ignore_consumed(), Vec2::new(3.0, 4.0));
//! ```

use kurbo::{Point, Size, Vec2};
use smallvec::SmallVec;

/// Identifier of a pointer, stable from down to up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

bitflags::bitflags! {
    /// Parts of a [`PointerInputChange`] that have been claimed by a recognizer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConsumedFlags: u8 {
        /// The position change was claimed.
        const POSITION_CHANGE = 0b0000_0001;
        /// The down/up transition was claimed.
        const DOWN_CHANGE     = 0b0000_0010;
    }
}

/// One pointer's state in a batch, with its previous state and consumption.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInputChange {
    /// Pointer this change belongs to.
    pub id: PointerId,
    /// Timestamp of this snapshot, in milliseconds.
    pub uptime_millis: u64,
    /// Current position.
    pub position: Point,
    /// Whether the pointer is currently pressed.
    pub pressed: bool,
    /// Timestamp of the previous snapshot.
    pub previous_uptime_millis: u64,
    /// Position in the previous snapshot.
    pub previous_position: Point,
    /// Whether the pointer was pressed in the previous snapshot.
    pub previous_pressed: bool,
    /// What has been consumed so far.
    pub consumed: ConsumedFlags,
}

impl PointerInputChange {
    /// A fresh pointer going down at `position`.
    pub fn down(id: PointerId, uptime_millis: u64, position: Point) -> Self {
        Self {
            id,
            uptime_millis,
            position,
            pressed: true,
            previous_uptime_millis: uptime_millis,
            previous_position: position,
            previous_pressed: false,
            consumed: ConsumedFlags::empty(),
        }
    }

    /// The next snapshot of this pointer, still pressed, at `position`.
    pub fn moved_to(&self, uptime_millis: u64, position: Point) -> Self {
        self.next(uptime_millis, position, true)
    }

    /// The next snapshot of this pointer, still pressed, moved by `delta`.
    pub fn moved_by(&self, uptime_millis: u64, delta: Vec2) -> Self {
        self.next(uptime_millis, self.position + delta, true)
    }

    /// The next snapshot of this pointer, released at its current position.
    pub fn lifted(&self, uptime_millis: u64) -> Self {
        self.next(uptime_millis, self.position, false)
    }

    fn next(&self, uptime_millis: u64, position: Point, pressed: bool) -> Self {
        Self {
            id: self.id,
            uptime_millis,
            position,
            pressed,
            previous_uptime_millis: self.uptime_millis,
            previous_position: self.position,
            previous_pressed: self.pressed,
            consumed: ConsumedFlags::empty(),
        }
    }

    /// The pointer went down in this change and the down has not been consumed.
    pub fn changed_to_down(&self) -> bool {
        !self.consumed.contains(ConsumedFlags::DOWN_CHANGE) && self.changed_to_down_ignore_consumed()
    }

    /// The pointer went down in this change.
    pub fn changed_to_down_ignore_consumed(&self) -> bool {
        !self.previous_pressed && self.pressed
    }

    /// The pointer went up in this change and the up has not been consumed.
    pub fn changed_to_up(&self) -> bool {
        !self.consumed.contains(ConsumedFlags::DOWN_CHANGE) && self.changed_to_up_ignore_consumed()
    }

    /// The pointer went up in this change.
    pub fn changed_to_up_ignore_consumed(&self) -> bool {
        self.previous_pressed && !self.pressed
    }

    /// Unconsumed motion since the previous snapshot, or zero once consumed.
    pub fn position_change(&self) -> Vec2 {
        if self.position_change_consumed() {
            Vec2::ZERO
        } else {
            self.position_change_ignore_consumed()
        }
    }

    /// Motion since the previous snapshot, regardless of consumption.
    pub fn position_change_ignore_consumed(&self) -> Vec2 {
        self.position - self.previous_position
    }

    /// Whether there is unconsumed motion.
    pub fn position_changed(&self) -> bool {
        self.position_change() != Vec2::ZERO
    }

    /// Whether the pointer moved, regardless of consumption.
    pub fn position_changed_ignore_consumed(&self) -> bool {
        self.position_change_ignore_consumed() != Vec2::ZERO
    }

    /// Whether another recognizer already claimed this motion.
    pub fn position_change_consumed(&self) -> bool {
        self.consumed.contains(ConsumedFlags::POSITION_CHANGE)
    }

    /// Claim the motion of this change.
    pub fn consume_position_change(&mut self) {
        self.consumed |= ConsumedFlags::POSITION_CHANGE;
    }

    /// Claim the down/up transition of this change.
    pub fn consume_down_change(&mut self) {
        self.consumed |= ConsumedFlags::DOWN_CHANGE;
    }

    /// Claim everything in this change.
    pub fn consume_all_changes(&mut self) {
        self.consumed = ConsumedFlags::all();
    }

    /// Whether the position lies outside a handler of the given size (origin at zero).
    pub fn is_out_of_bounds(&self, size: Size) -> bool {
        let Point { x, y } = self.position;
        x < 0.0 || x > size.width || y < 0.0 || y > size.height
    }
}

/// One dispatched batch of pointer changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    /// Changes in this batch, in platform order.
    pub changes: SmallVec<[PointerInputChange; 4]>,
}

impl PointerEvent {
    /// Build a batch from changes.
    pub fn new(changes: impl IntoIterator<Item = PointerInputChange>) -> Self {
        Self {
            changes: changes.into_iter().collect(),
        }
    }

    /// The change for `id`, if it is part of this batch.
    pub fn change(&self, id: PointerId) -> Option<&PointerInputChange> {
        self.changes.iter().find(|c| c.id == id)
    }

    /// Mutable access to the change for `id`.
    pub fn change_mut(&mut self, id: PointerId) -> Option<&mut PointerInputChange> {
        self.changes.iter_mut().find(|c| c.id == id)
    }

    /// Whether `id` is not pressed in this batch (absent pointers count as up).
    pub fn is_pointer_up(&self, id: PointerId) -> bool {
        self.change(id).is_none_or(|c| !c.pressed)
    }

    /// The first pointer that is pressed in this batch.
    pub fn first_pressed(&self) -> Option<&PointerInputChange> {
        self.changes.iter().find(|c| c.pressed)
    }

    /// Whether any pointer is pressed in this batch.
    pub fn any_pressed(&self) -> bool {
        self.first_pressed().is_some()
    }

    /// Latest timestamp among the changes, or zero for an empty batch.
    pub fn uptime_millis(&self) -> u64 {
        self.changes
            .iter()
            .map(|c| c.uptime_millis)
            .max()
            .unwrap_or(0)
    }
}

/// Dispatch pass of a [`PointerEvent`].
///
/// Each batch is delivered three times along the handler path: `Initial` from
/// the root down, `Main` from the target up, and `Final` from the root down.
/// Consumption made in an earlier pass is visible in later passes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventPass {
    /// Ancestors see the batch before descendants.
    Initial,
    /// Descendants see the batch before ancestors. Recognizers do their work here.
    Main,
    /// Ancestors see the batch after everyone else; used to observe late consumption.
    Final,
}
