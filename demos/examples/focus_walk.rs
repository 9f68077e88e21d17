// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! D-pad navigation over a 3×3 grid of keys, plus Tab traversal.
//!
//! Shows how geometric search picks the next key, how a disabled key is
//! skipped, and how every transition is reported as a `FocusChange`.
//!
//! Run:
//! - `cargo run -p waymark_demos --example focus_walk`

use kurbo::Rect;
use waymark_focus::{FocusDirection, FocusError, FocusNode, FocusNodeId, FocusTree};

fn main() -> Result<(), FocusError> {
    let mut tree = FocusTree::new();
    let root = tree.insert(
        None,
        FocusNode {
            rect: Rect::new(0.0, 0.0, 300.0, 300.0),
            ..FocusNode::default()
        },
    )?;

    let mut keys: Vec<(FocusNodeId, String)> = Vec::new();
    for row in 0..3 {
        for col in 0..3 {
            let x = f64::from(col) * 100.0;
            let y = f64::from(row) * 100.0;
            let id = tree.insert(
                Some(root),
                FocusNode {
                    rect: Rect::new(x + 10.0, y + 10.0, x + 90.0, y + 90.0),
                    ..FocusNode::default()
                },
            )?;
            keys.push((id, format!("key{}", row * 3 + col + 1)));
        }
    }
    let name = |id: FocusNodeId| {
        keys.iter()
            .find(|(k, _)| *k == id)
            .map_or("root", |(_, n)| n.as_str())
    };

    // The center key is out of service.
    tree.set_disabled(keys[4].0, true)?;

    use FocusDirection::*;
    for direction in [Right, Down, Down, Left, Up, Up, Next, Next, Previous] {
        let moved = tree.move_focus(root, direction)?;
        let leaf = tree.focused_leaf(root)?;
        println!(
            "{direction:?}: moved={moved}, focused={}",
            leaf.map_or("none", name)
        );
    }

    println!("-- transitions --");
    for change in tree.take_changes() {
        println!(
            "{:>5}: {:?} -> {:?}",
            name(change.node),
            change.previous,
            change.current
        );
    }
    Ok(())
}
