// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{FocusDirection, FocusNodeId};

/// Errors reported by [`FocusTree`](crate::FocusTree) operations.
///
/// Every error leaves the tree exactly as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    /// The identifier refers to a removed node.
    #[error("focus node {0:?} is stale")]
    StaleNode(FocusNodeId),
    /// A node in the `ActiveParent` state has no focused child.
    #[error("ActiveParent node {0:?} must have a focused child")]
    MissingFocusedChild(FocusNodeId),
    /// The node passed as a child is not a direct child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent that was asked.
        parent: FocusNodeId,
        /// The node that is not one of its children.
        child: FocusNodeId,
    },
    /// Geometric search was asked for a linear direction.
    #[error("{0:?} is not a two-dimensional focus direction")]
    NotTwoDimensional(FocusDirection),
}
