// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-slop detection.
//!
//! A [`TouchSlopDetector`] follows one pointer after it went down and decides
//! whether the motion is an intentional drag. It accumulates the unconsumed
//! motion of the tracked pointer at [`PointerEventPass::Main`]; once the
//! accumulated distance reaches the touch slop it offers the change to the
//! caller's `on_touch_slop_reached` callback together with the motion beyond
//! the slop. The callback *claims* the gesture by consuming the change's
//! position change.
//!
//! Arbitration with competing recognizers:
//! - A position change already consumed at `Main` (by a descendant) cancels
//!   the detection.
//! - While below the slop the detector re-checks the same change at
//!   [`PointerEventPass::Final`] and cancels if an ancestor consumed it.
//! - If the tracked pointer lifts while another is down, the detector follows
//!   the other pointer without resetting; if it was the last pointer, the
//!   detection ends.
//!
//! An axis-locked detector only counts motion along its [`Orientation`], which
//! lets a vertical and a horizontal recognizer share one pointer stream with
//! exactly one of them claiming it.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use waymark_gesture::{
//!     PointerEvent, PointerEventPass, PointerId, PointerInputChange, SlopResult,
//!     TouchSlopDetector,
//! };
//!
//! let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
//! let mut event = PointerEvent::new([down.clone()]);
//! let mut slop = TouchSlopDetector::new(PointerId(1), &event, 10.0, None);
//!
//! event = PointerEvent::new([down.moved_to(16, Point::new(0.0, 20.0))]);
//! let result = slop.feed(&mut event, PointerEventPass::Main, |change, over_slop| {
//!     assert_eq!(over_slop, Vec2::new(0.0, 10.0));
//!     change.consume_position_change();
//! });
//! assert!(matches!(result, SlopResult::Claimed(_)));
//! ```

use kurbo::Vec2;

use crate::config::Orientation;
use crate::pointer::{PointerEvent, PointerEventPass, PointerId, PointerInputChange};

/// Outcome of feeding one pass to a [`TouchSlopDetector`].
#[derive(Clone, Debug, PartialEq)]
pub enum SlopResult {
    /// Keep feeding passes.
    Pending,
    /// The callback claimed this change; the drag starts here.
    Claimed(PointerInputChange),
    /// Another recognizer claimed the motion, or every pointer lifted.
    Canceled,
}

/// Observable state of a [`TouchSlopDetector`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlopState {
    /// No motion accumulated.
    Idle,
    /// Motion accumulated but below the slop.
    Accumulating,
    /// The callback claimed a change.
    Claimed,
    /// A competing recognizer consumed the motion.
    Canceled,
    /// The last pointer lifted before the slop was claimed.
    AllPointersUp,
}

/// Touch-slop state machine for one gesture.
#[derive(Clone, Debug)]
pub struct TouchSlopDetector {
    pointer: PointerId,
    touch_slop: f64,
    orientation: Option<Orientation>,
    offset: Vec2,
    axis_total: f64,
    state: SlopState,
    claimed: Option<PointerInputChange>,
    verify_at_final: bool,
}

impl TouchSlopDetector {
    /// Start tracking `pointer` from `current_event`, the batch in which it is known to be down.
    ///
    /// If the pointer is already up in `current_event`, the detector starts out
    /// [`SlopState::Canceled`]. `orientation` locks detection to one axis;
    /// `None` measures motion in any direction.
    pub fn new(
        pointer: PointerId,
        current_event: &PointerEvent,
        touch_slop: f64,
        orientation: Option<Orientation>,
    ) -> Self {
        let state = if current_event.is_pointer_up(pointer) {
            SlopState::Canceled
        } else {
            SlopState::Idle
        };
        Self {
            pointer,
            touch_slop,
            orientation,
            offset: Vec2::ZERO,
            axis_total: 0.0,
            state,
            claimed: None,
            verify_at_final: false,
        }
    }

    /// The pointer currently leading the gesture.
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    /// Current state.
    pub fn state(&self) -> SlopState {
        self.state
    }

    /// Whether the detector reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            SlopState::Claimed | SlopState::Canceled | SlopState::AllPointersUp
        )
    }

    /// Feed one pass of `event`.
    ///
    /// `on_touch_slop_reached` receives the change that crossed the slop and the
    /// motion beyond it; it claims the gesture by calling
    /// [`PointerInputChange::consume_position_change`]. If it declines, the
    /// accumulated motion is reset and detection continues. Axis-locked
    /// detectors report the excess along their axis only.
    ///
    /// Once finished, the terminal outcome is returned again without looking at `event`.
    pub fn feed(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        on_touch_slop_reached: impl FnOnce(&mut PointerInputChange, Vec2),
    ) -> SlopResult {
        match self.state {
            SlopState::Claimed => {
                return self
                    .claimed
                    .clone()
                    .map_or(SlopResult::Canceled, SlopResult::Claimed);
            }
            SlopState::Canceled | SlopState::AllPointersUp => return SlopResult::Canceled,
            SlopState::Idle | SlopState::Accumulating => {}
        }
        match pass {
            PointerEventPass::Initial => SlopResult::Pending,
            PointerEventPass::Main => self.on_main(event, on_touch_slop_reached),
            PointerEventPass::Final => self.on_final(event),
        }
    }

    fn on_main(
        &mut self,
        event: &mut PointerEvent,
        on_touch_slop_reached: impl FnOnce(&mut PointerInputChange, Vec2),
    ) -> SlopResult {
        self.verify_at_final = false;
        let other_down = event.first_pressed().map(|c| c.id);
        let Some(change) = event.change_mut(self.pointer) else {
            log::warn!("tracked pointer {:?} missing from batch", self.pointer);
            return self.finish(SlopState::Canceled);
        };
        if change.position_change_consumed() {
            return self.finish(SlopState::Canceled);
        }
        if change.changed_to_up_ignore_consumed() {
            return match other_down {
                Some(next) => {
                    log::trace!("touch slop: {:?} lifted, following {next:?}", self.pointer);
                    self.pointer = next;
                    SlopResult::Pending
                }
                None => self.finish(SlopState::AllPointersUp),
            };
        }

        match self.orientation {
            None => {
                self.offset += change.position_change();
                let distance = self.offset.hypot();
                if distance >= self.touch_slop {
                    let over_slop = if distance > 0.0 {
                        self.offset - self.offset * (self.touch_slop / distance)
                    } else {
                        Vec2::ZERO
                    };
                    on_touch_slop_reached(change, over_slop);
                    if change.position_change_consumed() {
                        return self.claim(change.clone());
                    }
                    self.offset = Vec2::ZERO;
                }
                self.verify_at_final = true;
                self.state = if self.offset == Vec2::ZERO {
                    SlopState::Idle
                } else {
                    SlopState::Accumulating
                };
            }
            Some(axis) => {
                self.axis_total += axis.component(change.position - change.previous_position);
                if self.axis_total.abs() < self.touch_slop {
                    self.verify_at_final = true;
                    self.state = if self.axis_total == 0.0 {
                        SlopState::Idle
                    } else {
                        SlopState::Accumulating
                    };
                } else {
                    let over_slop =
                        self.axis_total - self.axis_total.signum() * self.touch_slop;
                    on_touch_slop_reached(change, axis.vector(over_slop));
                    if change.position_change_consumed() {
                        return self.claim(change.clone());
                    }
                    self.axis_total = 0.0;
                    self.state = SlopState::Idle;
                }
            }
        }
        SlopResult::Pending
    }

    fn on_final(&mut self, event: &PointerEvent) -> SlopResult {
        if !core::mem::take(&mut self.verify_at_final) {
            return SlopResult::Pending;
        }
        match event.change(self.pointer) {
            Some(change) if change.position_change_consumed() => {
                log::trace!("touch slop: {:?} claimed by an ancestor", self.pointer);
                self.finish(SlopState::Canceled)
            }
            _ => SlopResult::Pending,
        }
    }

    fn claim(&mut self, change: PointerInputChange) -> SlopResult {
        log::debug!("touch slop claimed by {:?}", change.id);
        self.state = SlopState::Claimed;
        self.claimed = Some(change.clone());
        SlopResult::Claimed(change)
    }

    fn finish(&mut self, state: SlopState) -> SlopResult {
        self.state = state;
        SlopResult::Canceled
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    const SLOP: f64 = 10.0;

    fn start(orientation: Option<Orientation>) -> (TouchSlopDetector, PointerInputChange) {
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let event = PointerEvent::new([down.clone()]);
        (
            TouchSlopDetector::new(PointerId(1), &event, SLOP, orientation),
            down,
        )
    }

    fn claim(change: &mut PointerInputChange, _: Vec2) {
        change.consume_position_change();
    }

    #[test]
    fn jitter_below_slop_never_calls_back() {
        let (mut slop, down) = start(None);
        let mut last = down;
        for (i, dx) in [3.0, -3.0, 4.0, -4.0, 2.0].into_iter().enumerate() {
            last = last.moved_by(i as u64 + 1, Vec2::new(dx, 1.0));
            let mut event = PointerEvent::new([last.clone()]);
            let result = slop.feed(&mut event, PointerEventPass::Main, |_, _| {
                panic!("slop must not be reached");
            });
            assert_eq!(result, SlopResult::Pending);
            assert_eq!(
                slop.feed(&mut event, PointerEventPass::Final, claim),
                SlopResult::Pending
            );
        }
        assert_eq!(slop.state(), SlopState::Accumulating);
    }

    #[test]
    fn free_slop_reports_excess_along_motion() {
        let (mut slop, down) = start(None);
        let mut event = PointerEvent::new([down.moved_to(1, Point::new(6.0, 8.0))]);
        let mut over = Vec2::ZERO;
        let result = slop.feed(&mut event, PointerEventPass::Main, |change, o| {
            over = o;
            change.consume_position_change();
        });
        assert!(matches!(result, SlopResult::Claimed(ref c) if c.position == Point::new(6.0, 8.0)));
        assert!((over - Vec2::ZERO).hypot() < 1e-9, "exactly at slop: {over:?}");
        assert!(event.changes[0].position_change_consumed());
        assert_eq!(slop.state(), SlopState::Claimed);
    }

    #[test]
    fn declined_callback_resets_accumulator() {
        let (mut slop, down) = start(None);
        let moved = down.moved_to(1, Point::new(0.0, 12.0));
        let mut event = PointerEvent::new([moved.clone()]);
        let mut calls = 0;
        slop.feed(&mut event, PointerEventPass::Main, |_, _| calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(slop.state(), SlopState::Idle);

        // 5 more pixels are not enough after the reset.
        let mut event = PointerEvent::new([moved.moved_by(2, Vec2::new(0.0, 5.0))]);
        slop.feed(&mut event, PointerEventPass::Main, |_, _| calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(slop.state(), SlopState::Accumulating);
    }

    #[test]
    fn consumed_at_main_cancels() {
        let (mut slop, down) = start(None);
        let mut moved = down.moved_by(1, Vec2::new(1.0, 0.0));
        moved.consume_position_change();
        let mut event = PointerEvent::new([moved]);
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Canceled
        );
        assert_eq!(slop.state(), SlopState::Canceled);
    }

    #[test]
    fn consumed_at_final_cancels() {
        let (mut slop, down) = start(None);
        let mut event = PointerEvent::new([down.moved_by(1, Vec2::new(1.0, 0.0))]);
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Pending
        );
        // An ancestor claims the motion between Main and Final.
        event.changes[0].consume_position_change();
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Final, claim),
            SlopResult::Canceled
        );
    }

    #[test]
    fn lift_switches_to_remaining_pointer() {
        let a = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        let b = PointerInputChange::down(PointerId(2), 0, Point::new(50.0, 50.0));
        let event = PointerEvent::new([a.clone(), b.clone()]);
        let mut slop = TouchSlopDetector::new(PointerId(1), &event, SLOP, None);

        let mut event = PointerEvent::new([a.lifted(1), b.moved_by(1, Vec2::ZERO)]);
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Pending
        );
        assert_eq!(slop.pointer(), PointerId(2));

        let mut event = PointerEvent::new([b.moved_by(2, Vec2::new(0.0, 20.0))]);
        assert!(matches!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Claimed(ref c) if c.id == PointerId(2)
        ));
    }

    #[test]
    fn last_lift_ends_detection() {
        let (mut slop, down) = start(None);
        let mut event = PointerEvent::new([down.lifted(1)]);
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Canceled
        );
        assert_eq!(slop.state(), SlopState::AllPointersUp);
    }

    #[test]
    fn pointer_already_up_starts_canceled() {
        let up = PointerInputChange::down(PointerId(1), 0, Point::ZERO).lifted(1);
        let event = PointerEvent::new([up]);
        let slop = TouchSlopDetector::new(PointerId(1), &event, SLOP, None);
        assert_eq!(slop.state(), SlopState::Canceled);
    }

    #[test]
    fn vertical_detector_ignores_horizontal_motion() {
        let (mut slop, down) = start(Some(Orientation::Vertical));
        let mut event = PointerEvent::new([down.moved_to(1, Point::new(30.0, 3.0))]);
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Main, claim),
            SlopResult::Pending
        );

        let mut over = Vec2::ZERO;
        let mut event = PointerEvent::new([down
            .moved_to(1, Point::new(30.0, 3.0))
            .moved_to(2, Point::new(30.0, -11.0))]);
        let result = slop.feed(&mut event, PointerEventPass::Main, |change, o| {
            over = o;
            change.consume_position_change();
        });
        assert!(matches!(result, SlopResult::Claimed(_)));
        assert_eq!(over, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn axis_decline_skips_final_check() {
        let (mut slop, down) = start(Some(Orientation::Horizontal));
        let mut event = PointerEvent::new([down.moved_to(1, Point::new(15.0, 0.0))]);
        slop.feed(&mut event, PointerEventPass::Main, |_, _| {});
        event.changes[0].consume_position_change();
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Final, claim),
            SlopResult::Pending
        );
        assert_eq!(slop.state(), SlopState::Idle);
    }

    #[test]
    fn free_decline_still_checks_final() {
        let (mut slop, down) = start(None);
        let mut event = PointerEvent::new([down.moved_to(1, Point::new(15.0, 0.0))]);
        slop.feed(&mut event, PointerEventPass::Main, |_, _| {});
        event.changes[0].consume_position_change();
        assert_eq!(
            slop.feed(&mut event, PointerEventPass::Final, claim),
            SlopResult::Canceled
        );
    }
}
