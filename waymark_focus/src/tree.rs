// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus tree storage: slots, structure, geometry, and change records.

use alloc::vec::Vec;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::FocusError;
use crate::types::{FocusChange, FocusNode, FocusNodeId, FocusState};

/// Arena of focus nodes.
///
/// Each node carries a [`FocusState`], a layout rectangle and an optional
/// focused child. The focused child is a lookup relation into the arena (a
/// [`FocusNodeId`]), never an owning link, so removing a node can never leave a
/// dangling reference behind: stale identifiers are detected and reported as
/// [`FocusError::StaleNode`].
///
/// State transitions go through [`FocusTree::request_focus`],
/// [`FocusTree::clear_focus`], [`FocusTree::capture_focus`],
/// [`FocusTree::free_focus`] and [`FocusTree::set_disabled`]; each recorded
/// transition is queued as a [`FocusChange`] until [`FocusTree::take_changes`]
/// is called.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use waymark_focus::{FocusNode, FocusState, FocusTree};
///
/// let mut tree = FocusTree::new();
/// let root = tree.insert(None, FocusNode::default()).unwrap();
/// let button = tree
///     .insert(
///         Some(root),
///         FocusNode {
///             rect: Rect::new(0.0, 0.0, 40.0, 20.0),
///             ..FocusNode::default()
///         },
///     )
///     .unwrap();
///
/// assert!(tree.request_focus(button).unwrap());
/// assert_eq!(tree.state(button), Some(FocusState::Active));
/// assert_eq!(tree.state(root), Some(FocusState::ActiveParent));
/// assert_eq!(tree.focused_child(root), Some(button));
/// ```
pub struct FocusTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    changes: Vec<FocusChange>,
}

impl core::fmt::Debug for FocusTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("FocusTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("pending_changes", &self.changes.len())
            .finish_non_exhaustive()
    }
}

impl Default for FocusTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<FocusNodeId>,
    pub(crate) children: SmallVec<[FocusNodeId; 4]>,
    pub(crate) rect: Rect,
    pub(crate) state: FocusState,
    pub(crate) focused_child: Option<FocusNodeId>,
    pub(crate) order: Option<i32>,
}

impl Node {
    fn new(generation: u32, desc: FocusNode) -> Self {
        Self {
            generation,
            parent: None,
            children: SmallVec::new(),
            rect: desc.rect,
            state: desc.state,
            focused_child: None,
            order: desc.order,
        }
    }
}

impl FocusTree {
    /// Create an empty focus tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// The initial state is taken from `node` as is. Hosts restoring a saved
    /// focus state are responsible for keeping it consistent; focus should
    /// normally be acquired with [`FocusTree::request_focus`].
    pub fn insert(
        &mut self,
        parent: Option<FocusNodeId>,
        node: FocusNode,
    ) -> Result<FocusNodeId, FocusError> {
        if let Some(p) = parent {
            self.get(p)?;
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, node));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "FocusNodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, node)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "FocusNodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = FocusNodeId::new(idx, generation);
        if let Some(p) = parent {
            self.get_mut(p)?.children.push(id);
            self.get_mut(id)?.parent = Some(p);
        }
        Ok(id)
    }

    /// Remove a node and its subtree.
    ///
    /// If the subtree holds focus, focus is forcibly cleared first (capture is
    /// overridden) and the removed node is detached from its parent's focus
    /// path, so no remaining node refers to a removed one.
    pub fn remove(&mut self, id: FocusNodeId) -> Result<(), FocusError> {
        if self.get(id)?.state.has_focus() {
            self.clear_focus(id, true)?;
        }
        if let Some(parent) = self.get(id)?.parent {
            self.get_mut(parent)?.children.retain(|c| *c != id);
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: FocusNodeId) {
        let Some(node) = self.nodes.get_mut(id.idx()).and_then(Option::take) else {
            return;
        };
        for child in node.children {
            self.free_subtree(child);
        }
        self.free_list.push(id.idx());
    }

    /// Update the layout rectangle of a node.
    pub fn set_rect(&mut self, id: FocusNodeId, rect: Rect) -> Result<(), FocusError> {
        self.get_mut(id)?.rect = rect;
        Ok(())
    }

    /// Update the explicit linear traversal key of a node.
    pub fn set_order(&mut self, id: FocusNodeId, order: Option<i32>) -> Result<(), FocusError> {
        self.get_mut(id)?.order = order;
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: FocusNodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Returns the focus state of a node, or `None` for stale ids.
    pub fn state(&self, id: FocusNodeId) -> Option<FocusState> {
        self.get(id).ok().map(|n| n.state)
    }

    /// Returns the layout rectangle of a node, or `None` for stale ids.
    pub fn rect(&self, id: FocusNodeId) -> Option<Rect> {
        self.get(id).ok().map(|n| n.rect)
    }

    /// Returns the explicit linear traversal key of a node.
    pub fn order(&self, id: FocusNodeId) -> Option<i32> {
        self.get(id).ok().and_then(|n| n.order)
    }

    /// Returns the focused child of an `ActiveParent` node.
    pub fn focused_child(&self, id: FocusNodeId) -> Option<FocusNodeId> {
        self.get(id).ok().and_then(|n| n.focused_child)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: FocusNodeId) -> Option<FocusNodeId> {
        self.get(id).ok().and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: FocusNodeId) -> &[FocusNodeId] {
        match self.get(id) {
            Ok(n) => &n.children,
            Err(_) => &[],
        }
    }

    /// Follow the focused-child chain from `id` down to the focused leaf.
    ///
    /// Returns `Ok(None)` if `id` does not hold focus.
    pub fn focused_leaf(&self, id: FocusNodeId) -> Result<Option<FocusNodeId>, FocusError> {
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.state {
                FocusState::Active | FocusState::Captured => return Ok(Some(current)),
                FocusState::ActiveParent => {
                    current = node
                        .focused_child
                        .ok_or(FocusError::MissingFocusedChild(current))?;
                }
                FocusState::Inactive | FocusState::Disabled => return Ok(None),
            }
        }
    }

    /// Drain the queued focus-state transitions, oldest first.
    pub fn take_changes(&mut self) -> Vec<FocusChange> {
        core::mem::take(&mut self.changes)
    }

    /// Live descendants of `root` in pre-order, excluding `root` itself.
    ///
    /// A disabled node and its whole subtree are skipped.
    pub(crate) fn focusable_descendants(&self, root: FocusNodeId) -> Vec<FocusNodeId> {
        let enabled =
            |id: &FocusNodeId| !matches!(self.state(*id), Some(FocusState::Disabled) | None);
        let mut out = Vec::new();
        let mut stack: Vec<FocusNodeId> = self
            .children_of(root)
            .iter()
            .rev()
            .copied()
            .filter(enabled)
            .collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children_of(id).iter().rev().copied().filter(enabled));
        }
        out
    }

    pub(crate) fn get(&self, id: FocusNodeId) -> Result<&Node, FocusError> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
            .ok_or(FocusError::StaleNode(id))
    }

    pub(crate) fn get_mut(&mut self, id: FocusNodeId) -> Result<&mut Node, FocusError> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
            .ok_or(FocusError::StaleNode(id))
    }

    /// Set the state of a live node, queueing a [`FocusChange`] if it differs.
    pub(crate) fn set_state(&mut self, id: FocusNodeId, state: FocusState) -> Result<(), FocusError> {
        let node = self.get_mut(id)?;
        let previous = node.state;
        if previous == state {
            return Ok(());
        }
        node.state = state;
        log::trace!("focus node {id:?}: {previous:?} -> {state:?}");
        self.changes.push(FocusChange {
            node: id,
            previous,
            current: state,
        });
        Ok(())
    }
}
