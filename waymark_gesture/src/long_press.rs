// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag recognizer that starts after a long press instead of after the touch slop.

use kurbo::{Point, Size};

use crate::config::ViewConfiguration;
use crate::detector::DragHandler;
use crate::dispatch::PointerInputHandler;
use crate::drag::{DragResult, DragTracker, first_down};
use crate::pointer::{ConsumedFlags, PointerEvent, PointerEventPass, PointerId};

#[derive(Clone, Debug)]
struct LongPressWait {
    pointer: PointerId,
    position: Point,
    deadline_millis: u64,
    check_final: bool,
}

#[derive(Clone, Debug)]
enum Phase {
    AwaitingFirstDown,
    AwaitingLongPress(LongPressWait),
    Dragging(DragTracker),
    AwaitingAllUp,
}

/// Recognizes a drag that begins once a pointer has been held down for the long-press timeout.
///
/// While waiting, the press is abandoned without any callback when every
/// pointer lifts, when a down change was consumed or a pointer leaves the
/// bounds (checked at [`PointerEventPass::Main`]), or when any position
/// change was consumed (checked at [`PointerEventPass::Final`]). If the
/// tracked pointer lifts while another is pressed, the other one is followed.
///
/// The timeout is a deadline of `down.uptime_millis + long_press_timeout_millis`.
/// It fires either from [`PointerInputHandler::on_time`] or when a batch
/// stamped at or after the deadline arrives; in the latter case that batch
/// already belongs to the drag.
#[derive(Clone, Debug)]
pub struct LongPressDragGestureDetector<H> {
    handler: H,
    config: ViewConfiguration,
    phase: Phase,
}

impl<H: DragHandler> LongPressDragGestureDetector<H> {
    /// Create a detector reporting to `handler`.
    pub fn new(config: ViewConfiguration, handler: H) -> Self {
        Self {
            handler,
            config,
            phase: Phase::AwaitingFirstDown,
        }
    }

    /// The callbacks receiver.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the callbacks receiver.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the detector, returning the callbacks receiver.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Whether a press is being held or dragged.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::AwaitingLongPress(_) | Phase::Dragging(_))
    }

    /// Whether the long press fired and the drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// The pending long-press deadline, if a press is being held.
    pub fn deadline_millis(&self) -> Option<u64> {
        match &self.phase {
            Phase::AwaitingLongPress(wait) => Some(wait.deadline_millis),
            _ => None,
        }
    }

    fn fire_if_due(&mut self, now_millis: u64) {
        if let Phase::AwaitingLongPress(wait) = &self.phase
            && now_millis >= wait.deadline_millis
        {
            log::debug!("long press of {:?} at {now_millis}ms", wait.pointer);
            let (pointer, position) = (wait.pointer, wait.position);
            self.handler.on_drag_start(position);
            self.phase = Phase::Dragging(DragTracker::tracking(pointer, None));
        }
    }

    fn end_gesture(&mut self, event: &PointerEvent) {
        self.phase = if event.any_pressed() {
            Phase::AwaitingAllUp
        } else {
            Phase::AwaitingFirstDown
        };
    }
}

/// Advance a held press by one pass; `true` abandons it.
fn wait_abandoned(
    wait: &mut LongPressWait,
    event: &PointerEvent,
    pass: PointerEventPass,
    bounds: Size,
) -> bool {
    match pass {
        PointerEventPass::Initial => false,
        PointerEventPass::Main => {
            wait.check_final = true;
            let all_up = !event.changes.is_empty()
                && event
                    .changes
                    .iter()
                    .all(|c| c.changed_to_up_ignore_consumed());
            if all_up
                || event
                    .changes
                    .iter()
                    .any(|c| c.consumed.contains(ConsumedFlags::DOWN_CHANGE))
                || event.changes.iter().any(|c| c.is_out_of_bounds(bounds))
            {
                return true;
            }
            if event.is_pointer_up(wait.pointer) {
                let Some(next) = event.first_pressed() else {
                    return true;
                };
                log::trace!("long press: {:?} lifted, following {:?}", wait.pointer, next.id);
                wait.pointer = next.id;
                wait.position = next.position;
            } else if let Some(change) = event.change(wait.pointer) {
                wait.position = change.position;
            }
            false
        }
        PointerEventPass::Final => {
            core::mem::take(&mut wait.check_final)
                && event.changes.iter().any(|c| c.position_change_consumed())
        }
    }
}

impl<H: DragHandler> PointerInputHandler for LongPressDragGestureDetector<H> {
    fn on_pointer_event(&mut self, event: &mut PointerEvent, pass: PointerEventPass, bounds: Size) {
        self.fire_if_due(event.uptime_millis());
        match &mut self.phase {
            Phase::AwaitingFirstDown => {
                if pass == PointerEventPass::Main
                    && let Some(down) = first_down(event)
                {
                    log::trace!("long press: first down {:?}", down.id);
                    self.phase = Phase::AwaitingLongPress(LongPressWait {
                        pointer: down.id,
                        position: down.position,
                        deadline_millis: down
                            .uptime_millis
                            .saturating_add(self.config.long_press_timeout_millis),
                        check_final: false,
                    });
                }
            }
            Phase::AwaitingLongPress(wait) => {
                if wait_abandoned(wait, event, pass, bounds) {
                    log::debug!("long press abandoned");
                    self.end_gesture(event);
                }
            }
            Phase::Dragging(tracker) => {
                let handler = &mut self.handler;
                let result = tracker.feed(event, pass, |change| {
                    let amount = change.position_change();
                    handler.on_drag(change, amount);
                    change.consume_position_change();
                });
                match result {
                    DragResult::Pending => {}
                    DragResult::Completed => {
                        for change in event.changes.iter_mut().filter(|c| c.changed_to_up()) {
                            change.consume_down_change();
                        }
                        self.handler.on_drag_end();
                        self.end_gesture(event);
                    }
                    DragResult::Canceled => {
                        self.handler.on_drag_cancel();
                        self.end_gesture(event);
                    }
                }
            }
            Phase::AwaitingAllUp => {
                if pass == PointerEventPass::Final && !event.any_pressed() {
                    self.phase = Phase::AwaitingFirstDown;
                }
            }
        }
    }

    fn on_time(&mut self, now_millis: u64) {
        self.fire_if_due(now_millis);
    }

    fn on_cancel(&mut self) {
        if self.is_active() {
            log::debug!("long-press detector torn down mid-gesture");
            self.handler.on_drag_cancel();
        }
        self.phase = Phase::AwaitingFirstDown;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;
    use crate::detector::tests::{BOUNDS, Call, Recorder, all_passes};
    use crate::pointer::PointerInputChange;

    fn detector() -> LongPressDragGestureDetector<Recorder> {
        LongPressDragGestureDetector::new(ViewConfiguration::default(), Recorder::default())
    }

    fn send(
        d: &mut LongPressDragGestureDetector<Recorder>,
        change: &PointerInputChange,
    ) -> PointerEvent {
        let mut event = PointerEvent::new([change.clone()]);
        all_passes(d, &mut event);
        event
    }

    #[test]
    fn hold_then_drag() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        let nudge = down.moved_by(100, Vec2::new(1.0, 0.0));
        send(&mut d, &down);
        assert_eq!(d.deadline_millis(), Some(500));
        send(&mut d, &nudge);
        assert!(d.handler().0.is_empty());

        d.on_time(499);
        assert!(!d.is_dragging());
        d.on_time(500);
        assert!(d.is_dragging());

        let moved = nudge.moved_by(600, Vec2::new(5.0, 0.0));
        let event = send(&mut d, &moved);
        assert!(event.changes[0].position_change_consumed());

        let event = send(&mut d, &moved.lifted(700));
        assert!(event.changes[0].consumed.contains(ConsumedFlags::DOWN_CHANGE));
        assert_eq!(
            d.handler().0,
            [
                Call::Start(Point::new(11.0, 10.0)),
                Call::Drag(Vec2::new(5.0, 0.0)),
                Call::End,
            ]
        );
        assert!(!d.is_active());
    }

    #[test]
    fn late_event_fires_timeout_and_drags() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);
        send(&mut d, &down.moved_by(650, Vec2::new(3.0, 0.0)));
        assert_eq!(
            d.handler().0,
            [
                Call::Start(Point::new(10.0, 10.0)),
                Call::Drag(Vec2::new(3.0, 0.0)),
            ]
        );
    }

    #[test]
    fn lift_before_timeout_is_silent() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);
        send(&mut d, &down.lifted(200));
        d.on_time(10_000);
        assert!(d.handler().0.is_empty());
        assert!(!d.is_active());
    }

    #[test]
    fn leaving_bounds_abandons_press() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);
        send(&mut d, &down.moved_to(100, Point::new(-5.0, 10.0)));
        d.on_time(10_000);
        assert!(d.handler().0.is_empty());
        assert!(!d.is_active());
    }

    #[test]
    fn consumed_motion_abandons_press_at_final() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);

        let mut scrolled = down.moved_by(100, Vec2::new(0.0, 40.0));
        let mut event = PointerEvent::new([scrolled.clone()]);
        d.on_pointer_event(&mut event, PointerEventPass::Main, BOUNDS);
        assert!(d.is_active());
        // An ancestor claims the motion after our Main pass.
        event.changes[0].consume_position_change();
        d.on_pointer_event(&mut event, PointerEventPass::Final, BOUNDS);
        assert!(!d.is_active());

        scrolled = scrolled.lifted(200);
        send(&mut d, &scrolled);
        d.on_time(10_000);
        assert!(d.handler().0.is_empty());
    }

    #[test]
    fn follows_second_pointer_when_first_lifts() {
        let mut d = detector();
        let a = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        let b = PointerInputChange::down(PointerId(2), 0, Point::new(50.0, 50.0));
        let mut event = PointerEvent::new([a.clone(), b.clone()]);
        all_passes(&mut d, &mut event);
        let mut event = PointerEvent::new([a.lifted(100), b.moved_by(100, Vec2::ZERO)]);
        all_passes(&mut d, &mut event);
        d.on_time(500);
        assert_eq!(d.handler().0, [Call::Start(Point::new(50.0, 50.0))]);
    }

    #[test]
    fn consumed_down_abandons_press() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);

        // A descendant claimed the press before the timeout.
        let mut held = down.moved_by(100, Vec2::ZERO);
        held.consume_down_change();
        send(&mut d, &held);
        assert!(!d.is_active());

        d.on_time(10_000);
        assert!(d.handler().0.is_empty());
        assert!(!d.is_active());
    }

    #[test]
    fn teardown_while_holding_cancels() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::new(10.0, 10.0));
        send(&mut d, &down);
        assert_eq!(d.deadline_millis(), Some(500));

        d.on_cancel();
        assert_eq!(d.handler().0, [Call::Cancel]);
        assert!(!d.is_active());

        // The abandoned deadline never fires.
        d.on_time(10_000);
        assert_eq!(d.handler().0, [Call::Cancel]);
    }

    #[test]
    fn teardown_mid_drag_cancels() {
        let mut d = detector();
        let down = PointerInputChange::down(PointerId(1), 0, Point::ZERO);
        send(&mut d, &down);
        d.on_time(500);
        d.on_cancel();
        assert_eq!(d.handler().0, [Call::Start(Point::ZERO), Call::Cancel]);
        assert!(!d.is_active());
    }
}
