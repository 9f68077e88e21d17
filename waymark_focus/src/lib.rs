// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Focus: a focus tree with focus-state transitions and focus search.
//!
//! This crate models keyboard and D-pad focus as:
//! - A **focus tree** ([`FocusTree`]): an arena of nodes, each with a layout
//!   rectangle supplied by the host's layout pass and a [`FocusState`].
//! - A **focus path**: every node from the root down to the focused leaf is
//!   `ActiveParent` and names its [`focused_child`](FocusTree::focused_child);
//!   the leaf is `Active` or `Captured`.
//! - **Transitions** ([`FocusTree::request_focus`], [`FocusTree::clear_focus`],
//!   [`FocusTree::capture_focus`], [`FocusTree::free_focus`],
//!   [`FocusTree::set_disabled`]) that keep the focus path well formed and
//!   report every state change as a [`FocusChange`].
//! - **Search** ([`FocusTree::search`], [`FocusTree::move_focus`]): geometric
//!   search for arrow keys and linear traversal for Tab / Shift+Tab.
//!
//! ## Minimal example
//!
//! Two buttons side by side; arrow keys move between them:
//!
//! ```rust
//! use kurbo::Rect;
//! use waymark_focus::{FocusDirection, FocusNode, FocusState, FocusTree};
//!
//! let mut tree = FocusTree::new();
//! let root = tree
//!     .insert(
//!         None,
//!         FocusNode {
//!             rect: Rect::new(0.0, 0.0, 100.0, 40.0),
//!             ..FocusNode::default()
//!         },
//!     )
//!     .unwrap();
//! let ok = tree
//!     .insert(
//!         Some(root),
//!         FocusNode {
//!             rect: Rect::new(0.0, 0.0, 40.0, 40.0),
//!             ..FocusNode::default()
//!         },
//!     )
//!     .unwrap();
//! let cancel = tree
//!     .insert(
//!         Some(root),
//!         FocusNode {
//!             rect: Rect::new(60.0, 0.0, 100.0, 40.0),
//!             ..FocusNode::default()
//!         },
//!     )
//!     .unwrap();
//!
//! tree.request_focus(ok).unwrap();
//! assert!(tree.move_focus(root, FocusDirection::Right).unwrap());
//! assert_eq!(tree.state(cancel), Some(FocusState::Active));
//! assert_eq!(tree.state(ok), Some(FocusState::Inactive));
//!
//! // Every transition is queued for the host.
//! assert!(!tree.take_changes().is_empty());
//! ```
//!
//! Geometry is expressed with [`kurbo::Rect`]; all rectangles in one tree
//! should share a coordinate space.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod search;
mod transitions;
mod tree;
mod types;

pub use error::FocusError;
pub use tree::FocusTree;
pub use types::{FocusChange, FocusDirection, FocusNode, FocusNodeId, FocusState};
