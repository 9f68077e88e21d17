// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-state transitions: request, clear, capture, free, and enablement.

use alloc::vec::Vec;

use crate::types::{FocusNodeId, FocusState};
use crate::{FocusError, FocusTree};

impl FocusTree {
    /// Clear focus from `id` and from every node below it on the focus path.
    ///
    /// Returns `Ok(true)` when the node no longer holds focus afterwards:
    /// - `Active` becomes `Inactive`.
    /// - `ActiveParent` clears its whole chain of focused children; every node on
    ///   the chain becomes `Inactive` and every focused-child link is dropped.
    /// - `Captured` becomes `Inactive` only when `forced` is set.
    /// - `Inactive` and `Disabled` are left unchanged.
    ///
    /// Returns `Ok(false)` when a captured node on the chain refuses a
    /// non-forced clear. The whole chain is validated before anything is
    /// mutated, so a refusal or an error leaves every node untouched.
    ///
    /// When the cleared node was on its parent's focus path it is detached
    /// from the parent, which becomes `Active` and keeps the focus.
    ///
    /// ```rust
    /// use waymark_focus::{FocusNode, FocusState, FocusTree};
    ///
    /// let mut tree = FocusTree::new();
    /// let root = tree.insert(None, FocusNode::default()).unwrap();
    /// let field = tree.insert(Some(root), FocusNode::default()).unwrap();
    /// tree.request_focus(field).unwrap();
    /// tree.capture_focus(field).unwrap();
    ///
    /// // A captured field keeps focus unless the clear is forced.
    /// assert!(!tree.clear_focus(root, false).unwrap());
    /// assert_eq!(tree.state(field), Some(FocusState::Captured));
    /// assert!(tree.clear_focus(root, true).unwrap());
    /// assert_eq!(tree.state(field), Some(FocusState::Inactive));
    /// ```
    pub fn clear_focus(&mut self, id: FocusNodeId, forced: bool) -> Result<bool, FocusError> {
        let was_on_path = self.get(id)?.state.has_focus();
        if !self.clear_chain(id, forced)? {
            log::debug!("clear_focus({id:?}) refused by captured focus");
            return Ok(false);
        }
        if was_on_path {
            self.detach_from_parent(id)?;
        }
        Ok(true)
    }

    /// Request focus for `id`.
    ///
    /// Inactive ancestors are activated on the way, and a sibling branch that
    /// held focus is cleared (without overriding capture). Returns `Ok(false)`
    /// if the node is disabled or an ancestor or the current focus owner
    /// refuses to hand focus over.
    pub fn request_focus(&mut self, id: FocusNodeId) -> Result<bool, FocusError> {
        let node = self.get(id)?;
        let (state, parent, focused_child) = (node.state, node.parent, node.focused_child);
        match state {
            FocusState::Active | FocusState::Captured => Ok(true),
            FocusState::Disabled => Ok(false),
            FocusState::ActiveParent => {
                let child = focused_child.ok_or(FocusError::MissingFocusedChild(id))?;
                if !self.clear_chain(child, false)? {
                    log::debug!("request_focus({id:?}) refused: descendant holds captured focus");
                    return Ok(false);
                }
                self.get_mut(id)?.focused_child = None;
                self.set_state(id, FocusState::Active)?;
                Ok(true)
            }
            FocusState::Inactive => match parent {
                Some(parent) => self.request_focus_for_child(parent, id),
                None => {
                    self.set_state(id, FocusState::Active)?;
                    Ok(true)
                }
            },
        }
    }

    /// Ask `parent` to hand focus down to its direct child `child`.
    ///
    /// An inactive parent first obtains focus from its own parent (a root
    /// grants itself). A captured or disabled parent refuses.
    pub fn request_focus_for_child(
        &mut self,
        parent: FocusNodeId,
        child: FocusNodeId,
    ) -> Result<bool, FocusError> {
        let parent_node = self.get(parent)?;
        if !parent_node.children.contains(&child) {
            return Err(FocusError::NotAChild { parent, child });
        }
        let (state, grandparent, previous) = (
            parent_node.state,
            parent_node.parent,
            parent_node.focused_child,
        );
        if self.get(child)?.state == FocusState::Disabled {
            return Ok(false);
        }
        match state {
            FocusState::Inactive => {
                let granted = match grandparent {
                    Some(grandparent) => self.request_focus_for_child(grandparent, parent)?,
                    None => {
                        self.set_state(parent, FocusState::Active)?;
                        true
                    }
                };
                if granted {
                    self.request_focus_for_child(parent, child)
                } else {
                    Ok(false)
                }
            }
            FocusState::Active => {
                self.set_state(child, FocusState::Active)?;
                self.get_mut(parent)?.focused_child = Some(child);
                self.set_state(parent, FocusState::ActiveParent)?;
                Ok(true)
            }
            FocusState::ActiveParent => {
                let previous = previous.ok_or(FocusError::MissingFocusedChild(parent))?;
                if previous == child {
                    return Ok(true);
                }
                if !self.clear_chain(previous, false)? {
                    log::debug!(
                        "focus request for {child:?} refused: {previous:?} holds captured focus"
                    );
                    return Ok(false);
                }
                self.set_state(child, FocusState::Active)?;
                self.get_mut(parent)?.focused_child = Some(child);
                Ok(true)
            }
            FocusState::Captured | FocusState::Disabled => Ok(false),
        }
    }

    /// Capture focus on an `Active` node so that only a forced clear can take it away.
    ///
    /// Returns `Ok(true)` if the node is captured afterwards.
    pub fn capture_focus(&mut self, id: FocusNodeId) -> Result<bool, FocusError> {
        match self.get(id)?.state {
            FocusState::Active => {
                self.set_state(id, FocusState::Captured)?;
                Ok(true)
            }
            FocusState::Captured => Ok(true),
            _ => Ok(false),
        }
    }

    /// Release captured focus, returning the node to `Active`.
    ///
    /// Returns `Ok(true)` if the node is focused and not captured afterwards.
    pub fn free_focus(&mut self, id: FocusNodeId) -> Result<bool, FocusError> {
        match self.get(id)?.state {
            FocusState::Captured => {
                self.set_state(id, FocusState::Active)?;
                Ok(true)
            }
            FocusState::Active => Ok(true),
            _ => Ok(false),
        }
    }

    /// Enable or disable a node.
    ///
    /// Disabling a node that holds focus forcibly clears it first.
    /// Re-enabling a disabled node makes it `Inactive`.
    pub fn set_disabled(&mut self, id: FocusNodeId, disabled: bool) -> Result<(), FocusError> {
        let state = self.get(id)?.state;
        if disabled {
            if state.has_focus() {
                self.clear_focus(id, true)?;
            }
            self.set_state(id, FocusState::Disabled)
        } else if state == FocusState::Disabled {
            self.set_state(id, FocusState::Inactive)
        } else {
            Ok(())
        }
    }

    /// Validate and then clear the focus chain starting at `id`, leaf first.
    ///
    /// Does not touch the parent of `id`.
    fn clear_chain(&mut self, id: FocusNodeId, forced: bool) -> Result<bool, FocusError> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            current = match node.state {
                FocusState::ActiveParent => Some(
                    node.focused_child
                        .ok_or(FocusError::MissingFocusedChild(node_id))?,
                ),
                FocusState::Captured if !forced => return Ok(false),
                _ => None,
            };
            chain.push(node_id);
        }

        for &node_id in chain.iter().rev() {
            let node = self.get_mut(node_id)?;
            node.focused_child = None;
            if node.state.has_focus() {
                self.set_state(node_id, FocusState::Inactive)?;
            }
        }
        Ok(true)
    }

    fn detach_from_parent(&mut self, id: FocusNodeId) -> Result<(), FocusError> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        let parent_node = self.get_mut(parent)?;
        if parent_node.focused_child == Some(id) {
            parent_node.focused_child = None;
            self.set_state(parent, FocusState::Active)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::{FocusChange, FocusError, FocusNode, FocusNodeId, FocusState, FocusTree};

    fn with_state(state: FocusState) -> FocusNode {
        FocusNode {
            state,
            ..FocusNode::default()
        }
    }

    /// root -> parent -> grandchild chain, focused on the grandchild.
    fn focused_chain() -> (FocusTree, FocusNodeId, FocusNodeId, FocusNodeId) {
        let mut tree = FocusTree::new();
        let root = tree.insert(None, FocusNode::default()).unwrap();
        let parent = tree.insert(Some(root), FocusNode::default()).unwrap();
        let leaf = tree.insert(Some(parent), FocusNode::default()).unwrap();
        assert!(tree.request_focus(leaf).unwrap());
        tree.take_changes();
        (tree, root, parent, leaf)
    }

    #[test]
    fn active_is_cleared() {
        let mut tree = FocusTree::new();
        let node = tree.insert(None, with_state(FocusState::Active)).unwrap();
        assert!(tree.clear_focus(node, false).unwrap());
        assert_eq!(tree.state(node), Some(FocusState::Inactive));
    }

    #[test]
    fn active_with_active_parent_is_cleared() {
        let (mut tree, root, parent, leaf) = focused_chain();
        assert!(tree.clear_focus(leaf, false).unwrap());
        assert_eq!(tree.state(leaf), Some(FocusState::Inactive));
        assert_eq!(tree.focused_child(parent), None);
        assert_eq!(tree.state(parent), Some(FocusState::Active));
        assert_eq!(tree.state(root), Some(FocusState::ActiveParent));
    }

    #[test]
    fn active_parent_without_focused_child_is_an_error() {
        let mut tree = FocusTree::new();
        let node = tree.insert(None, with_state(FocusState::ActiveParent)).unwrap();
        assert_eq!(
            tree.clear_focus(node, false),
            Err(FocusError::MissingFocusedChild(node))
        );
        assert_eq!(tree.state(node), Some(FocusState::ActiveParent));
    }

    #[test]
    fn active_parent_chain_is_cleared() {
        let (mut tree, root, parent, leaf) = focused_chain();
        assert!(tree.clear_focus(root, false).unwrap());
        for id in [root, parent, leaf] {
            assert_eq!(tree.state(id), Some(FocusState::Inactive));
            assert_eq!(tree.focused_child(id), None);
        }
        // Leaf first, then up the chain.
        let order: Vec<_> = tree.take_changes().iter().map(|c| c.node).collect();
        assert_eq!(order, [leaf, parent, root]);
    }

    #[test]
    fn captured_is_cleared_only_when_forced() {
        let mut tree = FocusTree::new();
        let node = tree.insert(None, with_state(FocusState::Captured)).unwrap();
        assert!(!tree.clear_focus(node, false).unwrap());
        assert_eq!(tree.state(node), Some(FocusState::Captured));
        assert!(tree.clear_focus(node, true).unwrap());
        assert_eq!(tree.state(node), Some(FocusState::Inactive));
    }

    #[test]
    fn captured_leaf_blocks_the_whole_chain() {
        let (mut tree, root, parent, leaf) = focused_chain();
        assert!(tree.capture_focus(leaf).unwrap());
        tree.take_changes();

        assert!(!tree.clear_focus(root, false).unwrap());
        assert_eq!(tree.state(root), Some(FocusState::ActiveParent));
        assert_eq!(tree.state(parent), Some(FocusState::ActiveParent));
        assert_eq!(tree.state(leaf), Some(FocusState::Captured));
        assert_eq!(tree.focused_child(root), Some(parent));
        assert_eq!(tree.focused_child(parent), Some(leaf));
        assert!(tree.take_changes().is_empty(), "refusal must not emit changes");

        assert!(tree.clear_focus(root, true).unwrap());
        assert_eq!(tree.state(leaf), Some(FocusState::Inactive));
        assert_eq!(tree.state(root), Some(FocusState::Inactive));
    }

    #[test]
    fn broken_chain_mutates_nothing() {
        let mut tree = FocusTree::new();
        let root = tree.insert(None, FocusNode::default()).unwrap();
        let child = tree.insert(Some(root), FocusNode::default()).unwrap();
        tree.request_focus(child).unwrap();
        // Child claims to be a parent of focus but has nothing below it.
        tree.set_state(child, FocusState::ActiveParent).unwrap();
        tree.take_changes();

        assert_eq!(
            tree.clear_focus(root, true),
            Err(FocusError::MissingFocusedChild(child))
        );
        assert_eq!(tree.state(root), Some(FocusState::ActiveParent));
        assert!(tree.take_changes().is_empty(), "errors must not emit changes");
    }

    #[test]
    fn inactive_and_disabled_are_unchanged() {
        let mut tree = FocusTree::new();
        let inactive = tree.insert(None, FocusNode::default()).unwrap();
        let disabled = tree.insert(None, with_state(FocusState::Disabled)).unwrap();
        assert!(tree.clear_focus(inactive, false).unwrap());
        assert!(tree.clear_focus(disabled, true).unwrap());
        assert_eq!(tree.state(inactive), Some(FocusState::Inactive));
        assert_eq!(tree.state(disabled), Some(FocusState::Disabled));
        assert!(tree.take_changes().is_empty(), "no transition expected");
    }

    #[test]
    fn request_focus_activates_inactive_ancestors() {
        let (tree, root, parent, leaf) = focused_chain();
        assert_eq!(tree.state(root), Some(FocusState::ActiveParent));
        assert_eq!(tree.state(parent), Some(FocusState::ActiveParent));
        assert_eq!(tree.state(leaf), Some(FocusState::Active));
        assert_eq!(tree.focused_child(root), Some(parent));
        assert_eq!(tree.focused_leaf(root), Ok(Some(leaf)));
    }

    #[test]
    fn request_focus_moves_between_siblings() {
        let mut tree = FocusTree::new();
        let root = tree.insert(None, FocusNode::default()).unwrap();
        let a = tree.insert(Some(root), FocusNode::default()).unwrap();
        let b = tree.insert(Some(root), FocusNode::default()).unwrap();
        tree.request_focus(a).unwrap();
        tree.take_changes();

        assert!(tree.request_focus(b).unwrap());
        assert_eq!(tree.state(a), Some(FocusState::Inactive));
        assert_eq!(tree.state(b), Some(FocusState::Active));
        assert_eq!(tree.focused_child(root), Some(b));
        assert_eq!(
            tree.take_changes(),
            [
                FocusChange {
                    node: a,
                    previous: FocusState::Active,
                    current: FocusState::Inactive,
                },
                FocusChange {
                    node: b,
                    previous: FocusState::Inactive,
                    current: FocusState::Active,
                },
            ]
        );
    }

    #[test]
    fn captured_sibling_refuses_request() {
        let mut tree = FocusTree::new();
        let root = tree.insert(None, FocusNode::default()).unwrap();
        let a = tree.insert(Some(root), FocusNode::default()).unwrap();
        let b = tree.insert(Some(root), FocusNode::default()).unwrap();
        tree.request_focus(a).unwrap();
        tree.capture_focus(a).unwrap();

        assert!(!tree.request_focus(b).unwrap());
        assert_eq!(tree.state(a), Some(FocusState::Captured));
        assert_eq!(tree.state(b), Some(FocusState::Inactive));
    }

    #[test]
    fn request_focus_on_active_parent_takes_focus_back() {
        let (mut tree, root, parent, leaf) = focused_chain();
        assert!(tree.request_focus(parent).unwrap());
        assert_eq!(tree.state(parent), Some(FocusState::Active));
        assert_eq!(tree.state(leaf), Some(FocusState::Inactive));
        assert_eq!(tree.focused_child(root), Some(parent));
    }

    #[test]
    fn disabled_node_cannot_take_focus() {
        let mut tree = FocusTree::new();
        let root = tree.insert(None, FocusNode::default()).unwrap();
        let child = tree.insert(Some(root), with_state(FocusState::Disabled)).unwrap();
        assert!(!tree.request_focus(child).unwrap());
        assert_eq!(tree.state(root), Some(FocusState::Inactive));
    }

    #[test]
    fn request_for_foreign_child_is_an_error() {
        let mut tree = FocusTree::new();
        let a = tree.insert(None, FocusNode::default()).unwrap();
        let b = tree.insert(None, FocusNode::default()).unwrap();
        assert_eq!(
            tree.request_focus_for_child(a, b),
            Err(FocusError::NotAChild {
                parent: a,
                child: b
            })
        );
    }

    #[test]
    fn capture_and_free() {
        let mut tree = FocusTree::new();
        let node = tree.insert(None, FocusNode::default()).unwrap();
        assert!(!tree.capture_focus(node).unwrap());
        assert!(!tree.free_focus(node).unwrap());

        tree.request_focus(node).unwrap();
        assert!(tree.capture_focus(node).unwrap());
        assert!(tree.capture_focus(node).unwrap());
        assert_eq!(tree.state(node), Some(FocusState::Captured));
        assert!(tree.free_focus(node).unwrap());
        assert_eq!(tree.state(node), Some(FocusState::Active));
    }

    #[test]
    fn disabling_focused_node_overrides_capture() {
        let (mut tree, root, parent, leaf) = focused_chain();
        tree.capture_focus(leaf).unwrap();
        tree.set_disabled(parent, true).unwrap();
        assert_eq!(tree.state(parent), Some(FocusState::Disabled));
        assert_eq!(tree.state(leaf), Some(FocusState::Inactive));
        assert_eq!(tree.state(root), Some(FocusState::Active));

        tree.set_disabled(parent, false).unwrap();
        assert_eq!(tree.state(parent), Some(FocusState::Inactive));
    }
}
