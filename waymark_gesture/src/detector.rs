// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! High-level drag recognizers built from [`TouchSlopDetector`] and [`DragTracker`].
//!
//! A [`DragGestureDetector`] runs one gesture after another:
//!
//! 1. Wait for a batch in which every pointer went down.
//! 2. Detect the touch slop, claiming the crossing change by consuming its
//!    position change.
//! 3. Report [`DragHandler::on_drag_start`] with the claimed change's position
//!    and an initial [`DragHandler::on_drag`] with the motion beyond the slop.
//! 4. Report every further motion, consuming it, until the last pointer lifts
//!    ([`DragHandler::on_drag_end`]) or another recognizer consumes the motion
//!    ([`DragHandler::on_drag_cancel`]).
//! 5. Wait until no pointer is pressed before looking for the next gesture.
//!
//! If the slop is never claimed no callback fires at all.

use kurbo::{Point, Size, Vec2};

use crate::config::{Orientation, ViewConfiguration};
use crate::dispatch::PointerInputHandler;
use crate::drag::{DragResult, DragTracker, first_down};
use crate::pointer::{PointerEvent, PointerEventPass, PointerInputChange};
use crate::slop::{SlopResult, TouchSlopDetector};

/// Callbacks of a drag recognizer.
///
/// Axis-locked recognizers report `drag_amount` with the cross-axis component set to zero.
pub trait DragHandler {
    /// A drag started at `position`.
    fn on_drag_start(&mut self, position: Point) {
        let _ = position;
    }

    /// The pointer moved by `drag_amount` as part of the drag.
    fn on_drag(&mut self, change: &PointerInputChange, drag_amount: Vec2);

    /// The last pointer lifted; the drag ended normally.
    fn on_drag_end(&mut self) {}

    /// The drag was taken over by another recognizer or torn down.
    fn on_drag_cancel(&mut self) {}
}

/// Drop the cross-axis component of `v` for axis-locked drags.
pub(crate) fn project(orientation: Option<Orientation>, v: Vec2) -> Vec2 {
    match orientation {
        None => v,
        Some(axis) => axis.vector(axis.component(v)),
    }
}

#[derive(Clone, Debug)]
enum Phase {
    AwaitingFirstDown,
    AwaitingSlop(TouchSlopDetector),
    Dragging(DragTracker),
    AwaitingAllUp,
}

/// Drag recognizer with touch-slop detection, free or locked to one axis.
///
/// ```
/// use kurbo::{Point, Size, Vec2};
/// use waymark_gesture::{
///     DragGestureDetector, DragHandler, PointerEvent, PointerEventPass, PointerId,
///     PointerInputChange, PointerInputHandler, ViewConfiguration,
/// };
///
/// #[derive(Default)]
/// struct Total(Vec2, bool);
///
/// impl DragHandler for Total {
///     fn on_drag(&mut self, _: &PointerInputChange, amount: Vec2) {
///         self.0 += amount;
///     }
///     fn on_drag_end(&mut self) {
///         self.1 = true;
///     }
/// }
///
/// let config = ViewConfiguration { touch_slop: 8.0, ..ViewConfiguration::default() };
/// let mut detector = DragGestureDetector::new(config, Total::default());
/// let bounds = Size::new(100.0, 100.0);
///
/// let down = PointerInputChange::down(PointerId(0), 0, Point::new(10.0, 10.0));
/// let moved = down.moved_by(16, Vec2::new(20.0, 0.0));
/// let up = moved.lifted(32);
/// for change in [down, moved, up] {
///     let mut event = PointerEvent::new([change]);
///     for pass in [PointerEventPass::Initial, PointerEventPass::Main, PointerEventPass::Final] {
///         detector.on_pointer_event(&mut event, pass, bounds);
///     }
/// }
///
/// // Motion beyond the slop is reported, then the drag ends.
/// assert_eq!(detector.handler().0, Vec2::new(12.0, 0.0));
/// assert!(detector.handler().1);
/// ```
#[derive(Clone, Debug)]
pub struct DragGestureDetector<H> {
    handler: H,
    config: ViewConfiguration,
    orientation: Option<Orientation>,
    phase: Phase,
}

impl<H: DragHandler> DragGestureDetector<H> {
    /// Recognize drags in any direction.
    pub fn new(config: ViewConfiguration, handler: H) -> Self {
        Self::with_orientation(config, None, handler)
    }

    /// Recognize only vertical drags.
    pub fn vertical(config: ViewConfiguration, handler: H) -> Self {
        Self::with_orientation(config, Some(Orientation::Vertical), handler)
    }

    /// Recognize only horizontal drags.
    pub fn horizontal(config: ViewConfiguration, handler: H) -> Self {
        Self::with_orientation(config, Some(Orientation::Horizontal), handler)
    }

    /// Recognize drags locked to `orientation`, or free drags for `None`.
    pub fn with_orientation(
        config: ViewConfiguration,
        orientation: Option<Orientation>,
        handler: H,
    ) -> Self {
        Self {
            handler,
            config,
            orientation,
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

    /// Whether a gesture is between its first down and its end.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::AwaitingSlop(_) | Phase::Dragging(_))
    }

    /// Whether the touch slop has been claimed and the drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    fn end_gesture(&mut self, event: &PointerEvent) {
        self.phase = if event.any_pressed() {
            Phase::AwaitingAllUp
        } else {
            Phase::AwaitingFirstDown
        };
    }
}

impl<H: DragHandler> PointerInputHandler for DragGestureDetector<H> {
    fn on_pointer_event(&mut self, event: &mut PointerEvent, pass: PointerEventPass, _: Size) {
        match &mut self.phase {
            Phase::AwaitingFirstDown => {
                if pass == PointerEventPass::Main
                    && let Some(down) = first_down(event)
                {
                    log::trace!("drag detector: first down {:?}", down.id);
                    self.phase = Phase::AwaitingSlop(TouchSlopDetector::new(
                        down.id,
                        event,
                        self.config.touch_slop,
                        self.orientation,
                    ));
                }
            }
            Phase::AwaitingSlop(slop) => {
                let mut over_slop = Vec2::ZERO;
                let result = slop.feed(event, pass, |change, over| {
                    change.consume_position_change();
                    over_slop = over;
                });
                match result {
                    SlopResult::Pending => {}
                    SlopResult::Canceled => self.end_gesture(event),
                    SlopResult::Claimed(change) => {
                        self.handler.on_drag_start(change.position);
                        self.handler.on_drag(&change, over_slop);
                        self.phase = Phase::Dragging(DragTracker::new(
                            change.id,
                            event,
                            self.orientation,
                        ));
                    }
                }
            }
            Phase::Dragging(tracker) => {
                let handler = &mut self.handler;
                let orientation = self.orientation;
                let result = tracker.feed(event, pass, |change| {
                    let amount = project(orientation, change.position_change());
                    handler.on_drag(change, amount);
                    change.consume_position_change();
                });
                match result {
                    DragResult::Pending => {}
                    DragResult::Completed => {
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

    fn on_cancel(&mut self) {
        if self.is_active() {
            log::debug!("drag detector torn down mid-gesture");
            self.handler.on_drag_cancel();
        }
        self.phase = Phase::AwaitingFirstDown;
    }
}
