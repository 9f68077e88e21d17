// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the focus tree: node identifiers, focus states, directions, and change records.

use kurbo::Rect;

use crate::FocusError;

/// Identifier for a node in the focus tree (generational).
///
/// A removed node's identifier becomes stale; a later insertion may reuse the
/// slot but bumps the generation, so stale identifiers are never confused with
/// live ones.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FocusNodeId(pub(crate) u32, pub(crate) u32);

impl FocusNodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Focus state of a single node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusState {
    /// The node is not focused and none of its descendants are.
    #[default]
    Inactive,
    /// The node is the focused leaf.
    Active,
    /// One of the node's descendants is focused.
    ///
    /// A node in this state always has a [`FocusTree::focused_child`](crate::FocusTree::focused_child).
    ActiveParent,
    /// The node is focused and refuses to give focus up unless forced.
    Captured,
    /// The node cannot receive focus.
    Disabled,
}

impl FocusState {
    /// Whether the node is itself the focused leaf (`Active` or `Captured`).
    pub const fn is_focused(self) -> bool {
        matches!(self, Self::Active | Self::Captured)
    }

    /// Whether the node or one of its descendants holds focus.
    pub const fn has_focus(self) -> bool {
        matches!(self, Self::Active | Self::ActiveParent | Self::Captured)
    }

    /// Whether the node holds captured focus.
    pub const fn is_captured(self) -> bool {
        matches!(self, Self::Captured)
    }
}

/// Direction of a focus move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Next node in linear traversal order (for example, Tab).
    Next,
    /// Previous node in linear traversal order (for example, Shift+Tab).
    Previous,
    /// Nearest node to the left.
    Left,
    /// Nearest node to the right.
    Right,
    /// Nearest node above.
    Up,
    /// Nearest node below.
    Down,
}

impl FocusDirection {
    /// Whether this direction is resolved by geometric (two-dimensional) search.
    pub const fn is_two_dimensional(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }
}

/// The four geometric directions. Ranking helpers only accept this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction2D {
    Left,
    Right,
    Up,
    Down,
}

impl Direction2D {
    pub(crate) const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl TryFrom<FocusDirection> for Direction2D {
    type Error = FocusError;

    fn try_from(direction: FocusDirection) -> Result<Self, Self::Error> {
        match direction {
            FocusDirection::Left => Ok(Self::Left),
            FocusDirection::Right => Ok(Self::Right),
            FocusDirection::Up => Ok(Self::Up),
            FocusDirection::Down => Ok(Self::Down),
            FocusDirection::Next | FocusDirection::Previous => {
                Err(FocusError::NotTwoDimensional(direction))
            }
        }
    }
}

/// Initial data for a node inserted with [`FocusTree::insert`](crate::FocusTree::insert).
#[derive(Clone, Debug, Default)]
pub struct FocusNode {
    /// Bounds supplied by layout, in the coordinate space shared by the whole tree.
    pub rect: Rect,
    /// Initial focus state. Usually [`FocusState::Inactive`] or [`FocusState::Disabled`].
    pub state: FocusState,
    /// Optional explicit key for linear traversal; lower keys come first.
    pub order: Option<i32>,
}

/// A focus-state transition, queued for the host by every state change.
///
/// Drain the queue with [`FocusTree::take_changes`](crate::FocusTree::take_changes).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusChange {
    /// The node whose state changed.
    pub node: FocusNodeId,
    /// State before the transition.
    pub previous: FocusState,
    /// State after the transition.
    pub current: FocusState,
}
