// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag continuation after the touch slop has been claimed, and first-down detection.

use crate::config::Orientation;
use crate::pointer::{PointerEvent, PointerEventPass, PointerId, PointerInputChange};

/// Outcome of feeding one pass to a [`DragTracker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragResult {
    /// The drag is still in progress.
    Pending,
    /// The last pointer lifted; the drag ended normally.
    Completed,
    /// Another recognizer consumed the motion, or the pointer was already up.
    Canceled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DragState {
    Tracking,
    Completed,
    Canceled,
}

/// Follows a claimed pointer and reports each motion until it lifts or the drag is taken away.
///
/// Only [`PointerEventPass::Main`] is considered. Each batch in which the
/// tracked pointer moved (along the [`Orientation`] for axis-locked drags) is
/// handed to `on_drag`, unless the motion was already consumed, which cancels
/// the drag. When the tracked pointer lifts while another pointer is down, the
/// other pointer takes over.
#[derive(Clone, Debug)]
pub struct DragTracker {
    pointer: PointerId,
    orientation: Option<Orientation>,
    state: DragState,
}

impl DragTracker {
    /// Continue a drag of `pointer`, which must be down in `current_event`.
    pub fn new(
        pointer: PointerId,
        current_event: &PointerEvent,
        orientation: Option<Orientation>,
    ) -> Self {
        let state = if current_event.is_pointer_up(pointer) {
            DragState::Canceled
        } else {
            DragState::Tracking
        };
        Self {
            pointer,
            orientation,
            state,
        }
    }

    /// Continue a drag of `pointer` that is known to be down, without an event to check against.
    pub(crate) fn tracking(pointer: PointerId, orientation: Option<Orientation>) -> Self {
        Self {
            pointer,
            orientation,
            state: DragState::Tracking,
        }
    }

    /// The pointer currently driving the drag.
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    /// Whether the drag has completed or been canceled.
    pub fn is_finished(&self) -> bool {
        self.state != DragState::Tracking
    }

    /// Feed one pass of `event`. `on_drag` receives each change that moved.
    pub fn feed(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        on_drag: impl FnOnce(&mut PointerInputChange),
    ) -> DragResult {
        match self.state {
            DragState::Completed => return DragResult::Completed,
            DragState::Canceled => return DragResult::Canceled,
            DragState::Tracking => {}
        }
        if pass != PointerEventPass::Main {
            return DragResult::Pending;
        }

        let other_down = event.first_pressed().map(|c| c.id);
        let Some(change) = event.change_mut(self.pointer) else {
            log::warn!("dragged pointer {:?} missing from batch", self.pointer);
            self.state = DragState::Canceled;
            return DragResult::Canceled;
        };
        if change.changed_to_up_ignore_consumed() {
            if let Some(next) = other_down {
                log::trace!("drag: {:?} lifted, following {next:?}", self.pointer);
                self.pointer = next;
                return DragResult::Pending;
            }
            return self.finish(if change.position_change_consumed() {
                DragState::Canceled
            } else {
                DragState::Completed
            });
        }

        let moved = match self.orientation {
            None => change.position_changed_ignore_consumed(),
            Some(axis) => axis.component(change.position_change_ignore_consumed()) != 0.0,
        };
        if !moved {
            return DragResult::Pending;
        }
        if change.position_change_consumed() {
            return self.finish(DragState::Canceled);
        }
        on_drag(change);
        DragResult::Pending
    }

    fn finish(&mut self, state: DragState) -> DragResult {
        self.state = state;
        log::debug!("drag of {:?} finished: {state:?}", self.pointer);
        match state {
            DragState::Completed => DragResult::Completed,
            DragState::Tracking | DragState::Canceled => DragResult::Canceled,
        }
    }
}

/// The first change of a batch in which every pointer went down, consumption ignored.
///
/// This is how a recognizer waits for the start of a new gesture.
pub fn first_down(event: &PointerEvent) -> Option<&PointerInputChange> {
    if event
        .changes
        .iter()
        .all(PointerInputChange::changed_to_down_ignore_consumed)
    {
        event.changes.first()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use kurbo::{Point, Vec2};

    use super::*;

    fn consume(change: &mut PointerInputChange) {
        change.consume_position_change();
    }

    #[test]
    fn reports_moves_until_last_up() {
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let mut tracker = DragTracker::new(PointerId(1), &PointerEvent::new([down.clone()]), None);

        let m1 = down.moved_by(1, Vec2::new(1.0, 2.0));
        let still = m1.moved_by(2, Vec2::ZERO);
        let m2 = still.moved_by(3, Vec2::new(-4.0, 0.0));
        let mut seen = Vec::new();
        for change in [&m1, &still, &m2] {
            let mut event = PointerEvent::new([change.clone()]);
            let result = tracker.feed(&mut event, PointerEventPass::Main, |c| {
                seen.push(c.position_change());
                c.consume_position_change();
            });
            assert_eq!(result, DragResult::Pending);
        }
        assert_eq!(seen, [Vec2::new(1.0, 2.0), Vec2::new(-4.0, 0.0)]);

        let mut event = PointerEvent::new([m2.lifted(4)]);
        assert_eq!(
            tracker.feed(&mut event, PointerEventPass::Main, consume),
            DragResult::Completed
        );
        assert!(tracker.is_finished());
    }

    #[test]
    fn consumed_motion_cancels() {
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let mut tracker = DragTracker::new(PointerId(1), &PointerEvent::new([down.clone()]), None);
        let mut moved = down.moved_by(1, Vec2::new(3.0, 0.0));
        moved.consume_position_change();
        let mut event = PointerEvent::new([moved]);
        assert_eq!(
            tracker.feed(&mut event, PointerEventPass::Main, |_| panic!("canceled drag")),
            DragResult::Canceled
        );
    }

    #[test]
    fn other_passes_are_ignored() {
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let mut tracker = DragTracker::new(PointerId(1), &PointerEvent::new([down.clone()]), None);
        let mut event = PointerEvent::new([down.lifted(1)]);
        for pass in [PointerEventPass::Initial, PointerEventPass::Final] {
            assert_eq!(tracker.feed(&mut event, pass, consume), DragResult::Pending);
        }
    }

    #[test]
    fn axis_drag_ignores_cross_axis_motion() {
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let mut tracker = DragTracker::new(
            PointerId(1),
            &PointerEvent::new([down.clone()]),
            Some(Orientation::Horizontal),
        );
        let mut calls = 0;
        let mut event = PointerEvent::new([down.moved_by(1, Vec2::new(0.0, 9.0))]);
        tracker.feed(&mut event, PointerEventPass::Main, |_| calls += 1);
        assert_eq!(calls, 0);
        let mut event = PointerEvent::new([down.moved_by(1, Vec2::new(2.0, 9.0))]);
        tracker.feed(&mut event, PointerEventPass::Main, |_| calls += 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn lift_hands_drag_to_other_pointer() {
        let a = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let b = PointerInputChange::down(PointerId(2), 0, Point::new(9.0, 9.0));
        let mut tracker =
            DragTracker::new(PointerId(1), &PointerEvent::new([a.clone(), b.clone()]), None);
        let mut event = PointerEvent::new([a.lifted(1), b.moved_by(1, Vec2::ZERO)]);
        assert_eq!(
            tracker.feed(&mut event, PointerEventPass::Main, consume),
            DragResult::Pending
        );
        assert_eq!(tracker.pointer(), PointerId(2));
    }

    #[test]
    fn pointer_already_up_is_canceled() {
        let up = PointerInputChange::down(PointerId(1), 0, Point::ZERO).lifted(1);
        let event = PointerEvent::new([up.clone()]);
        let mut tracker = DragTracker::new(PointerId(1), &event, None);
        let mut event = PointerEvent::new([up.moved_by(2, Vec2::ZERO)]);
        assert_eq!(
            tracker.feed(&mut event, PointerEventPass::Main, consume),
            DragResult::Canceled
        );
    }

    #[test]
    fn first_down_requires_every_pointer_down() {
        let a = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let mut consumed = PointerInputChange::down(PointerId(2), 0, Point::ZERO);
        consumed.consume_down_change();
        let both = PointerEvent::new([a.clone(), consumed]);
        assert_eq!(first_down(&both).map(|c| c.id), Some(PointerId(1)));

        let mixed = PointerEvent::new([
            a.moved_by(1, Vec2::ZERO),
            PointerInputChange::down(PointerId(3), 1, Point::ZERO),
        ]);
        assert!(first_down(&mixed).is_none());
        assert!(first_down(&PointerEvent::default()).is_none());
    }
}
