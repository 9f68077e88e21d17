// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus search: geometric (two-dimensional) search, linear traversal, and focus moves.
//!
//! ## Two-dimensional ranking
//!
//! Candidates are ranked relative to a pivot rectangle (the focused leaf, or a
//! corner of the search root for the first focus):
//!
//! 1. A rectangle must lie at least partially in the direction of travel to be
//!    a candidate at all.
//! 2. A candidate that overlaps the pivot's *beam* (its extent perpendicular to
//!    the direction) beats one that does not. For vertical moves this only
//!    holds while the out-of-beam rectangle is not completely closer.
//! 3. Otherwise the smaller `13 * major² + minor²` wins, where `major` is the
//!    gap along the direction and `minor` is the offset between centre lines.
//!
//! Ties keep the earlier child.

use core::cmp::Ordering;

use kurbo::{Rect, Vec2};
use smallvec::SmallVec;

use crate::types::{Direction2D, FocusDirection, FocusNodeId, FocusState};
use crate::{FocusError, FocusTree};

/// Weight of the major-axis distance in the candidate distance.
const MAJOR_AXIS_WEIGHT: i64 = 13;

type Children = SmallVec<[FocusNodeId; 8]>;

impl FocusTree {
    /// Find the node that should receive focus when moving in `direction`.
    ///
    /// The search starts at `root` and follows the focus path. Two-dimensional
    /// directions use [`FocusTree::two_dimensional_search`]; `Next` and
    /// `Previous` walk the enabled descendants of `root` in linear order
    /// (explicit [`order`](crate::FocusNode::order) first, then reading order),
    /// wrapping around at the ends.
    ///
    /// ```rust
    /// use kurbo::Rect;
    /// use waymark_focus::{FocusDirection, FocusNode, FocusTree};
    ///
    /// let mut tree = FocusTree::new();
    /// let root = tree.insert(None, FocusNode::default()).unwrap();
    /// let mut row = Vec::new();
    /// for x in [0.0, 20.0, 40.0] {
    ///     let rect = Rect::new(x, 0.0, x + 10.0, 10.0);
    ///     row.push(tree.insert(Some(root), FocusNode { rect, ..FocusNode::default() }).unwrap());
    /// }
    /// tree.request_focus(row[0]).unwrap();
    ///
    /// assert_eq!(tree.search(root, FocusDirection::Right), Ok(Some(row[1])));
    /// assert_eq!(tree.search(root, FocusDirection::Previous), Ok(Some(row[2])));
    /// ```
    pub fn search(
        &self,
        root: FocusNodeId,
        direction: FocusDirection,
    ) -> Result<Option<FocusNodeId>, FocusError> {
        match Direction2D::try_from(direction) {
            Ok(direction) => self.search_2d(root, direction),
            Err(_) => self.search_linear(root, direction),
        }
    }

    /// Geometric focus search among the children of the nodes on the focus path.
    ///
    /// By state of `root`:
    /// - `Inactive`: `root` itself.
    /// - `Disabled`: nothing.
    /// - `ActiveParent`: search below a focused child that is itself an
    ///   `ActiveParent` first; otherwise rank this node's enabled children
    ///   relative to the focused leaf.
    /// - `Active` / `Captured`: first focus. With at most one enabled child it
    ///   is returned directly; otherwise children are ranked relative to the
    ///   top-left corner of `root` (`Right`, `Down`) or its bottom-right corner
    ///   (`Left`, `Up`).
    ///
    /// Returns [`FocusError::NotTwoDimensional`] for `Next`/`Previous` and
    /// [`FocusError::MissingFocusedChild`] when the focus path is broken.
    pub fn two_dimensional_search(
        &self,
        root: FocusNodeId,
        direction: FocusDirection,
    ) -> Result<Option<FocusNodeId>, FocusError> {
        self.search_2d(root, Direction2D::try_from(direction)?)
    }

    /// Move focus from the current focus owner below `root` in `direction`.
    ///
    /// Returns `Ok(true)` if focus moved to another node.
    pub fn move_focus(
        &mut self,
        root: FocusNodeId,
        direction: FocusDirection,
    ) -> Result<bool, FocusError> {
        let current = self.focused_leaf(root)?;
        let Some(target) = self.search(root, direction)? else {
            log::trace!("move_focus({direction:?}): no candidate");
            return Ok(false);
        };
        if Some(target) == current {
            return Ok(false);
        }
        log::debug!("move_focus({direction:?}): {current:?} -> {target:?}");
        self.request_focus(target)
    }

    fn search_2d(
        &self,
        node: FocusNodeId,
        direction: Direction2D,
    ) -> Result<Option<FocusNodeId>, FocusError> {
        let current = self.get(node)?;
        match current.state {
            FocusState::Inactive => Ok(Some(node)),
            FocusState::Disabled => Ok(None),
            FocusState::ActiveParent => {
                let focused = current
                    .focused_child
                    .ok_or(FocusError::MissingFocusedChild(node))?;
                if self.get(focused)?.state == FocusState::ActiveParent
                    && let Some(found) = self.search_2d(focused, direction)?
                {
                    return Ok(Some(found));
                }
                let leaf = self
                    .focused_leaf(node)?
                    .ok_or(FocusError::MissingFocusedChild(node))?;
                let pivot = self.get(leaf)?.rect;
                Ok(self.find_best_candidate(&self.focusable_children(node), pivot, direction))
            }
            FocusState::Active | FocusState::Captured => {
                let children = self.focusable_children(node);
                if children.len() <= 1 {
                    return Ok(children.first().copied());
                }
                let r = current.rect;
                let pivot = match direction {
                    Direction2D::Right | Direction2D::Down => Rect::new(r.x0, r.y0, r.x0, r.y0),
                    Direction2D::Left | Direction2D::Up => Rect::new(r.x1, r.y1, r.x1, r.y1),
                };
                Ok(self.find_best_candidate(&children, pivot, direction))
            }
        }
    }

    fn focusable_children(&self, node: FocusNodeId) -> Children {
        self.children_of(node)
            .iter()
            .copied()
            .filter(|&c| !matches!(self.state(c), Some(FocusState::Disabled) | None))
            .collect()
    }

    fn find_best_candidate(
        &self,
        candidates: &[FocusNodeId],
        focused: Rect,
        direction: Direction2D,
    ) -> Option<FocusNodeId> {
        // Start from a rectangle that can never be a candidate.
        let mut best = match direction {
            Direction2D::Left => focused + Vec2::new(focused.width() + 1.0, 0.0),
            Direction2D::Right => focused - Vec2::new(focused.width() + 1.0, 0.0),
            Direction2D::Up => focused + Vec2::new(0.0, focused.height() + 1.0),
            Direction2D::Down => focused - Vec2::new(0.0, focused.height() + 1.0),
        };
        let mut result = None;
        for &candidate in candidates {
            let Some(rect) = self.rect(candidate) else {
                continue;
            };
            if is_better_candidate(rect, best, focused, direction) {
                best = rect;
                result = Some(candidate);
            }
        }
        result
    }

    fn search_linear(
        &self,
        root: FocusNodeId,
        direction: FocusDirection,
    ) -> Result<Option<FocusNodeId>, FocusError> {
        let origin = self.focused_leaf(root)?;
        let mut candidates = self.focusable_descendants(root);
        if candidates.is_empty() {
            return Ok(None);
        }
        // Stable: ties keep tree order.
        candidates.sort_by(|&a, &b| self.compare_linear(a, b));

        let last = candidates.len() - 1;
        let origin_pos = origin.and_then(|o| candidates.iter().position(|&id| id == o));
        let next = match (direction, origin_pos) {
            (FocusDirection::Previous, Some(0)) | (FocusDirection::Previous, None) => last,
            (FocusDirection::Previous, Some(pos)) => pos - 1,
            (_, Some(pos)) if pos < last => pos + 1,
            _ => 0,
        };
        Ok(Some(candidates[next]))
    }

    fn compare_linear(&self, a: FocusNodeId, b: FocusNodeId) -> Ordering {
        let (ao, bo) = (self.order(a), self.order(b));
        let (ar, br) = (self.rect(a).unwrap_or_default(), self.rect(b).unwrap_or_default());
        match (ao, bo) {
            (Some(ao), Some(bo)) => ao.cmp(&bo).then_with(|| compare_rect_reading(&ar, &br)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_rect_reading(&ar, &br),
        }
    }
}

fn compare_rect_reading(a: &Rect, b: &Rect) -> Ordering {
    const RELATIVE_EPS: f64 = 1e-6;
    let ay = a.y0;
    let by = b.y0;
    if (ay - by).abs() > f64::max(ay.abs(), by.abs()) * RELATIVE_EPS {
        return ay.partial_cmp(&by).unwrap_or(Ordering::Equal);
    }
    a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal)
}

/// Whether `proposed` is a better next focus than `current`, moving from `focused`.
fn is_better_candidate(
    proposed: Rect,
    current: Rect,
    focused: Rect,
    direction: Direction2D,
) -> bool {
    if !is_candidate(proposed, focused, direction) {
        return false;
    }
    if !is_candidate(current, focused, direction) {
        return true;
    }
    if beam_beats(focused, proposed, current, direction) {
        return true;
    }
    if beam_beats(focused, current, proposed, direction) {
        return false;
    }
    weighted_distance(proposed, focused, direction) < weighted_distance(current, focused, direction)
}

/// At least partially in the direction of travel. Degenerate pivots are allowed.
fn is_candidate(rect: Rect, focused: Rect, direction: Direction2D) -> bool {
    match direction {
        Direction2D::Left => {
            (focused.x1 > rect.x1 || focused.x0 >= rect.x1) && focused.x0 > rect.x0
        }
        Direction2D::Right => {
            (focused.x0 < rect.x0 || focused.x1 <= rect.x0) && focused.x1 < rect.x1
        }
        Direction2D::Up => (focused.y1 > rect.y1 || focused.y0 >= rect.y1) && focused.y0 > rect.y0,
        Direction2D::Down => {
            (focused.y0 < rect.y0 || focused.y1 <= rect.y0) && focused.y1 < rect.y1
        }
    }
}

/// Gap between the source's leading edge and the near edge of `rect`, clamped at zero.
fn major_axis_distance(rect: Rect, source: Rect, direction: Direction2D) -> f64 {
    let distance = match direction {
        Direction2D::Left => source.x0 - rect.x1,
        Direction2D::Right => rect.x0 - source.x1,
        Direction2D::Up => source.y0 - rect.y1,
        Direction2D::Down => rect.y0 - source.y1,
    };
    distance.max(0.0)
}

/// Gap between the source's leading edge and the far edge of `rect`, at least one.
fn major_axis_distance_to_far_edge(rect: Rect, source: Rect, direction: Direction2D) -> f64 {
    let distance = match direction {
        Direction2D::Left => source.x0 - rect.x0,
        Direction2D::Right => rect.x1 - source.x1,
        Direction2D::Up => source.y0 - rect.y0,
        Direction2D::Down => rect.y1 - source.y1,
    };
    distance.max(1.0)
}

/// Offset between the centre lines perpendicular to the direction.
fn minor_axis_distance(rect: Rect, focused: Rect, direction: Direction2D) -> f64 {
    if direction.is_horizontal() {
        (focused.y0 + focused.height() / 2.0) - (rect.y0 + rect.height() / 2.0)
    } else {
        (focused.x0 + focused.width() / 2.0) - (rect.x0 + rect.width() / 2.0)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Distances are truncated to whole units before weighting."
)]
fn weighted_distance(rect: Rect, focused: Rect, direction: Direction2D) -> i64 {
    let major = major_axis_distance(rect, focused, direction).abs() as i64;
    let minor = minor_axis_distance(rect, focused, direction).abs() as i64;
    MAJOR_AXIS_WEIGHT * major * major + minor * minor
}

/// Whether `r1` beats `r2` by being exclusively inside the source's beam.
fn beam_beats(source: Rect, r1: Rect, r2: Rect, direction: Direction2D) -> bool {
    let in_source_beam = |r: Rect| {
        if direction.is_horizontal() {
            r.y1 > source.y0 && r.y0 < source.y1
        } else {
            r.x1 > source.x0 && r.x0 < source.x1
        }
    };
    let in_direction_of_search = |r: Rect| match direction {
        Direction2D::Left => source.x0 >= r.x1,
        Direction2D::Right => source.x1 <= r.x0,
        Direction2D::Up => source.y0 >= r.y1,
        Direction2D::Down => source.y1 <= r.y0,
    };

    if in_source_beam(r2) || !in_source_beam(r1) {
        return false;
    }
    if !in_direction_of_search(r2) {
        return true;
    }
    if direction.is_horizontal() {
        return true;
    }
    major_axis_distance(r1, source, direction)
        < major_axis_distance_to_far_edge(r2, source, direction)
}
