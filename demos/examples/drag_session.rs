// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested drag recognizers arbitrating over one pointer stream.
//!
//! A horizontal pager hosts a vertical list, and the list hosts a row with a
//! long-press drag. The same samples are fed twice: once as a quick vertical
//! swipe (the list wins) and once as a press-and-hold followed by a drag
//! (the row wins once the timeout passes).
//!
//! Run:
//! - `cargo run -p waymark_demos --example drag_session`

use kurbo::{Point, Size, Vec2};
use waymark_gesture::{
    ChangeProducer, DragGestureDetector, DragHandler, LongPressDragGestureDetector, PointerId,
    PointerInputChange, PointerSample, ViewConfiguration, dispatch,
};

/// Prints every callback with the recognizer's name.
#[derive(Debug)]
struct Printer(&'static str);

impl DragHandler for Printer {
    fn on_drag_start(&mut self, position: Point) {
        println!("  {}: start at ({:.1}, {:.1})", self.0, position.x, position.y);
    }

    fn on_drag(&mut self, _: &PointerInputChange, drag_amount: Vec2) {
        println!("  {}: drag by ({:.1}, {:.1})", self.0, drag_amount.x, drag_amount.y);
    }

    fn on_drag_end(&mut self) {
        println!("  {}: end", self.0);
    }

    fn on_drag_cancel(&mut self) {
        println!("  {}: cancel", self.0);
    }
}

fn run(title: &str, samples: &[(u64, Point, bool)]) {
    println!("{title}");
    let config = ViewConfiguration::default();
    let bounds = Size::new(400.0, 800.0);
    let mut pager = DragGestureDetector::horizontal(config, Printer("pager"));
    let mut list = DragGestureDetector::vertical(config, Printer("list"));
    let mut row = LongPressDragGestureDetector::new(config, Printer("row"));
    let mut producer = ChangeProducer::new();

    for &(t, position, pressed) in samples {
        // The host clock ticks before each sample arrives.
        dispatch::advance_time(&mut [&mut pager, &mut list, &mut row], t);
        let mut event = producer.produce(&[PointerSample {
            id: PointerId(0),
            uptime_millis: t,
            position,
            pressed,
        }]);
        dispatch(
            &mut event,
            &mut [(&mut pager, bounds), (&mut list, bounds), (&mut row, bounds)],
        );
    }
    // The screen goes away; nothing is live anymore.
    dispatch::cancel_all(&mut [&mut pager, &mut list, &mut row]);
}

fn main() {
    let at = |x: f64, y: f64| Point::new(x, y);
    run(
        "quick swipe up:",
        &[
            (0, at(200.0, 600.0), true),
            (16, at(201.0, 580.0), true),
            (32, at(203.0, 540.0), true),
            (48, at(203.0, 540.0), false),
        ],
    );
    run(
        "press, hold, drag sideways:",
        &[
            (0, at(200.0, 300.0), true),
            (300, at(201.0, 301.0), true),
            (600, at(230.0, 305.0), true),
            (616, at(260.0, 305.0), true),
            (632, at(260.0, 305.0), false),
        ],
    );
}
