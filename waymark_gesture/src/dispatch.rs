// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-pass dispatch of pointer batches along a handler path.
//!
//! A path lists the handlers under a pointer from the root down to the
//! innermost one. Every batch visits the path three times:
//!
//! - [`PointerEventPass::Initial`]: root → leaf. Ancestors may act before
//!   their descendants.
//! - [`PointerEventPass::Main`]: leaf → root. The innermost recognizer gets
//!   the first chance to claim.
//! - [`PointerEventPass::Final`]: root → leaf. Ancestors observe what was
//!   consumed during `Main`.
//!
//! The same [`PointerEvent`] is handed to every call, so consumption made by
//! one handler is visible to every handler after it.
//!
//! ```
//! use waymark_gesture::dispatch;
//! use waymark_gesture::{PointerEvent, PointerEventPass};
//!
//! let path = ["root", "list", "row"];
//! let mut seen = Vec::new();
//! dispatch::run(&path, &mut PointerEvent::default(), |node, pass, _| {
//!     seen.push((pass, node));
//! });
//! assert_eq!(
//!     seen,
//!     [
//!         (PointerEventPass::Initial, "root"),
//!         (PointerEventPass::Initial, "list"),
//!         (PointerEventPass::Initial, "row"),
//!         (PointerEventPass::Main, "row"),
//!         (PointerEventPass::Main, "list"),
//!         (PointerEventPass::Main, "root"),
//!         (PointerEventPass::Final, "root"),
//!         (PointerEventPass::Final, "list"),
//!         (PointerEventPass::Final, "row"),
//!     ]
//! );
//! ```

use kurbo::Size;

use crate::pointer::{PointerEvent, PointerEventPass};

/// The passes in dispatch order.
pub const PASSES: [PointerEventPass; 3] = [
    PointerEventPass::Initial,
    PointerEventPass::Main,
    PointerEventPass::Final,
];

/// Something that takes part in pointer dispatch, usually a gesture recognizer.
pub trait PointerInputHandler {
    /// Handle one pass of `event`. `bounds` is the handler's size.
    fn on_pointer_event(&mut self, event: &mut PointerEvent, pass: PointerEventPass, bounds: Size);

    /// The clock advanced to `now_millis` without a new batch.
    fn on_time(&mut self, now_millis: u64) {
        let _ = now_millis;
    }

    /// The handler is being removed or its input scope torn down.
    fn on_cancel(&mut self);
}

/// Indices of a path of `len` handlers in the order `pass` visits them.
pub fn pass_order(len: usize, pass: PointerEventPass) -> impl Iterator<Item = usize> {
    (0..len).map(move |i| match pass {
        PointerEventPass::Main => len - 1 - i,
        PointerEventPass::Initial | PointerEventPass::Final => i,
    })
}

/// Visit `path` (root first) with every pass of `event`.
///
/// `handler` is called once per entry and pass, in dispatch order.
pub fn run<K: Copy>(
    path: &[K],
    event: &mut PointerEvent,
    mut handler: impl FnMut(K, PointerEventPass, &mut PointerEvent),
) {
    for pass in PASSES {
        for i in pass_order(path.len(), pass) {
            handler(path[i], pass, event);
        }
    }
}

/// Deliver `event` through every pass to the handlers in `path` (root first),
/// each with its own bounds.
pub fn dispatch(event: &mut PointerEvent, path: &mut [(&mut dyn PointerInputHandler, Size)]) {
    log::trace!(
        "dispatching {} change(s) to {} handler(s)",
        event.changes.len(),
        path.len()
    );
    for pass in PASSES {
        for i in pass_order(path.len(), pass) {
            let (handler, bounds) = &mut path[i];
            handler.on_pointer_event(event, pass, *bounds);
        }
    }
}

/// Advance the clock of every handler in `path`.
pub fn advance_time(path: &mut [&mut dyn PointerInputHandler], now_millis: u64) {
    for handler in path.iter_mut() {
        handler.on_time(now_millis);
    }
}

/// Tear down every handler in `path`, leaf first.
pub fn cancel_all(path: &mut [&mut dyn PointerInputHandler]) {
    for handler in path.iter_mut().rev() {
        handler.on_cancel();
    }
}
