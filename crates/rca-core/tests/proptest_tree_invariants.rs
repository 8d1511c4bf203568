//! Property-based invariant tests for the tree mutation engine.
//!
//! These tests verify structural invariants that must hold for any tree:
//!
//! 1. Branches off the edit path are shared by reference.
//! 2. Deleting the root is a no-op.
//! 3. Renaming is idempotent.
//! 4. An added child is found, labelled, empty, and last among its siblings.
//! 5. Deleting a node removes it and every former descendant.
//! 6. Swapping two siblings twice restores the original order.
//! 7. Ids stay unique after any sequence of adds.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use rca_core::node::{CauseNode, NodeRef, create_node};
use rca_core::tree::{
    SiblingScope, add_child_node, delete_node, find_node, insert_child, path_to, rename_node,
    reorder_siblings, subtree_ids,
};
use rca_core::NodeId;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Build a tree of `parents.len() + 1` nodes named `n0..nN`, where node
/// `i + 1` hangs under node `parents[i] % (i + 1)`.
fn build_tree(parents: &[usize]) -> NodeRef {
    let count = parents.len() + 1;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, p) in parents.iter().enumerate() {
        children[p % (i + 1)].push(i + 1);
    }

    fn build(idx: usize, children: &[Vec<usize>]) -> CauseNode {
        children[idx].iter().fold(
            CauseNode::new(format!("n{idx}"), format!("label {idx}")),
            |node, &child| node.with_child(build(child, children)),
        )
    }

    build(0, &children).into_ref()
}

fn tree_strategy() -> impl Strategy<Value = NodeRef> {
    prop::collection::vec(0usize..64, 0..40).prop_map(|parents| build_tree(&parents))
}

fn all_ids(root: &NodeRef) -> Vec<NodeId> {
    root.iter().map(|n| n.id().clone()).collect()
}

/// Collect every subtree that is not an ancestor of (or equal to) `target`.
fn off_path_subtrees<'a>(root: &'a NodeRef, target: &NodeId) -> Vec<&'a NodeRef> {
    let path: HashSet<NodeId> = path_to(root, target)
        .unwrap_or_default()
        .into_iter()
        .map(|n| n.id().clone())
        .collect();
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for child in node.children() {
            if path.contains(child.id()) {
                stack.push(child);
            } else {
                out.push(child);
            }
        }
    }
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Structural sharing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rename_shares_off_path_branches(root in tree_strategy(), pick in any::<prop::sample::Index>()) {
        let ids = all_ids(&root);
        let target = pick.get(&ids).clone();
        let renamed = rename_node(&root, &target, "renamed");

        for subtree in off_path_subtrees(&root, &target) {
            let after = find_node(&renamed, subtree.id()).expect("off-path node survives");
            prop_assert!(
                Arc::ptr_eq(subtree, after),
                "subtree {} was copied instead of shared",
                subtree.id()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Root deletion is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_root_is_noop(root in tree_strategy()) {
        let after = delete_node(&root, &NodeId::new("n0"));
        prop_assert!(Arc::ptr_eq(&root, &after));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Rename idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rename_idempotent(
        root in tree_strategy(),
        pick in any::<prop::sample::Index>(),
        label in "[a-zA-Z ]{0,24}",
    ) {
        let ids = all_ids(&root);
        let target = pick.get(&ids);
        let once = rename_node(&root, target, label.clone());
        let twice = rename_node(&once, target, label);
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Add then find
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn added_child_is_last_and_empty(
        root in tree_strategy(),
        pick in any::<prop::sample::Index>(),
        label in "[a-zA-Z ]{0,24}",
    ) {
        let ids = all_ids(&root);
        let parent = pick.get(&ids);
        let child = create_node(label.clone());
        let child_id = child.id().clone();
        let after = insert_child(&root, parent, child);

        let found = find_node(&after, &child_id).expect("child present");
        prop_assert_eq!(found.label(), label.as_str());
        prop_assert!(found.is_leaf());
        let parent_node = find_node(&after, parent).unwrap();
        prop_assert_eq!(parent_node.children().last().unwrap().id(), &child_id);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Delete cascade
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_removes_whole_subtree(root in tree_strategy(), pick in any::<prop::sample::Index>()) {
        let ids = all_ids(&root);
        let target = pick.get(&ids).clone();
        prop_assume!(target != "n0");

        let doomed = subtree_ids(&root, &target);
        let after = delete_node(&root, &target);
        for id in &doomed {
            prop_assert!(find_node(&after, id).is_none(), "{} survived", id);
        }
        prop_assert_eq!(after.subtree_len(), root.subtree_len() - doomed.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Swap involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn double_swap_restores_order(
        parents in prop::collection::vec(0usize..1, 2..8),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        // Every node hangs under the root, so all non-root nodes are categories.
        let root = build_tree(&parents);
        let cats: Vec<NodeId> = root.children().iter().map(|c| c.id().clone()).collect();
        let (from, to) = (a.get(&cats), b.get(&cats));

        let once = reorder_siblings(&root, &SiblingScope::Categories, from, to);
        let twice = reorder_siblings(&once, &SiblingScope::Categories, from, to);
        prop_assert_eq!(&*twice, &*root);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Unique ids
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ids_stay_unique_after_adds(root in tree_strategy(), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..20)) {
        let mut current = root;
        for pick in picks {
            let ids = all_ids(&current);
            let parent = pick.get(&ids).clone();
            current = add_child_node(&current, &parent, "Why?");
        }
        let ids = all_ids(&current);
        let unique: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }
}
