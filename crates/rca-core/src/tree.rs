#![forbid(unsafe_code)]

//! Structurally shared mutations and queries over the cause tree.
//!
//! Every mutation takes the current root and returns a new root. Only the
//! nodes on the path from the root to the edited node are rebuilt; every other
//! subtree is carried over by reference, so `Arc::ptr_eq` holds for untouched
//! branches across snapshots.
//!
//! # Failure Modes
//!
//! None. All operations are total: a stale or unknown id turns the operation
//! into a no-op that returns the input root itself (pointer-equal), and
//! queries return `None`. Edits arrive from UI events that can race with
//! state updates, so a stale id is expected input rather than an error.
//!
//! # Example
//!
//! ```
//! use rca_core::node::CauseNode;
//! use rca_core::tree::{add_child_node, find_node, rename_node};
//! use rca_core::NodeId;
//!
//! let root = CauseNode::new("root", "Problem")
//!     .with_child(CauseNode::new("supply", "Supply"))
//!     .into_ref();
//!
//! let root = add_child_node(&root, &NodeId::new("supply"), "Cold chain stockouts");
//! let root = rename_node(&root, &NodeId::new("supply"), "Supply chain");
//!
//! let supply = find_node(&root, &NodeId::new("supply")).unwrap();
//! assert_eq!(supply.label(), "Supply chain");
//! assert_eq!(supply.children()[0].label(), "Cold chain stockouts");
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::ids::{NodeId, PersonaId};
use crate::node::{CauseNode, NodeRef, create_node};

/// Structural role of a node, derived from its depth below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The diagram root (the problem statement).
    Root,
    /// A direct child of the root.
    Category,
    /// A direct child of a category ("direct cause").
    Cause,
    /// Any deeper descendant; `depth` counts from the root (so always >= 3).
    SubCause {
        /// Distance from the root.
        depth: usize,
    },
}

impl NodeRole {
    fn from_depth(depth: usize) -> Self {
        match depth {
            0 => Self::Root,
            1 => Self::Category,
            2 => Self::Cause,
            depth => Self::SubCause { depth },
        }
    }
}

/// Which sibling list a reorder applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingScope {
    /// The root's children.
    Categories,
    /// The children of the named node (normally a category).
    ChildrenOf(NodeId),
}

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Find a node by id (depth-first, pre-order).
#[must_use]
pub fn find_node<'a>(root: &'a NodeRef, id: &NodeId) -> Option<&'a NodeRef> {
    if root.id() == id {
        return Some(root);
    }
    root.children().iter().find_map(|child| find_node(child, id))
}

/// The nodes from `root` down to the node with `id`, inclusive on both ends.
#[must_use]
pub fn path_to<'a>(root: &'a NodeRef, id: &NodeId) -> Option<Vec<&'a NodeRef>> {
    fn walk<'a>(node: &'a NodeRef, id: &NodeId, path: &mut Vec<&'a NodeRef>) -> bool {
        path.push(node);
        if node.id() == id {
            return true;
        }
        for child in node.children() {
            if walk(child, id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    walk(root, id, &mut path).then_some(path)
}

/// The parent of the node with `id`. `None` for the root and unknown ids.
#[must_use]
pub fn parent_of<'a>(root: &'a NodeRef, id: &NodeId) -> Option<&'a NodeRef> {
    let path = path_to(root, id)?;
    let len = path.len();
    (len >= 2).then(|| path[len - 2])
}

/// Distance from the root (root = 0).
#[must_use]
pub fn depth_of(root: &NodeRef, id: &NodeId) -> Option<usize> {
    path_to(root, id).map(|path| path.len() - 1)
}

/// Structural role of the node with `id`.
#[must_use]
pub fn role_of(root: &NodeRef, id: &NodeId) -> Option<NodeRole> {
    depth_of(root, id).map(NodeRole::from_depth)
}

/// Ids of the node with `id` and all its descendants, pre-order.
///
/// Empty when the id is unknown.
#[must_use]
pub fn subtree_ids(root: &NodeRef, id: &NodeId) -> Vec<NodeId> {
    find_node(root, id)
        .map(|node| node.iter().map(|n| n.id().clone()).collect())
        .unwrap_or_default()
}

/// Whether any node in the tree has `id`.
#[must_use]
pub fn contains(root: &NodeRef, id: &NodeId) -> bool {
    find_node(root, id).is_some()
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────────────────────────

/// Replace the node with `id` by `updater(node)`.
///
/// Only the path from the root to the target is rebuilt. Unknown ids return
/// the input root unchanged.
#[must_use]
pub fn update_node<F>(root: &NodeRef, id: &NodeId, updater: F) -> NodeRef
where
    F: FnOnce(&CauseNode) -> CauseNode,
{
    let mut updater = Some(updater);
    match rebuild_path(root, &|node| node.id() == id, &mut |node| {
        updater.take().map(|f| Arc::new(f(node)))
    }) {
        Some(updated) => updated,
        None => {
            trace!(node_id = %id, "update_node: id not found, no-op");
            Arc::clone(root)
        }
    }
}

/// Append `child` to the children of `parent_id`.
#[must_use]
pub fn insert_child(root: &NodeRef, parent_id: &NodeId, child: CauseNode) -> NodeRef {
    update_node(root, parent_id, move |parent| {
        let mut parent = parent.clone();
        parent.children_mut().push(Arc::new(child));
        parent
    })
}

/// Append a freshly created node labelled `label` to `parent_id`'s children.
#[must_use]
pub fn add_child_node(root: &NodeRef, parent_id: &NodeId, label: impl Into<String>) -> NodeRef {
    insert_child(root, parent_id, create_node(label))
}

/// Set the label of the node with `id`.
///
/// Empty labels are accepted; callers supply their own fallback.
#[must_use]
pub fn rename_node(root: &NodeRef, id: &NodeId, label: impl Into<String>) -> NodeRef {
    let label = label.into();
    update_node(root, id, move |node| node.clone().with_label(label))
}

/// Remove the node with `id` (and its whole subtree) from its parent.
///
/// Deleting the root is a no-op: a diagram always has a root.
#[must_use]
pub fn delete_node(root: &NodeRef, id: &NodeId) -> NodeRef {
    if root.id() == id {
        trace!(node_id = %id, "delete_node: refusing to delete root");
        return Arc::clone(root);
    }
    match rebuild_path(root, &|node| node.child_index(id).is_some(), &mut |parent| {
        let mut parent = parent.clone();
        parent.children_mut().retain(|child| child.id() != id);
        Some(Arc::new(parent))
    }) {
        Some(updated) => updated,
        None => {
            trace!(node_id = %id, "delete_node: id not found, no-op");
            Arc::clone(root)
        }
    }
}

/// Swap the positions of two siblings inside the list chosen by `scope`.
///
/// A swap, not a move: reordering `[A, B, C]` with `(A, C)` yields
/// `[C, B, A]`. If either id is missing from that list, or both ids are the
/// same, the input root is returned unchanged.
#[must_use]
pub fn reorder_siblings(
    root: &NodeRef,
    scope: &SiblingScope,
    from_id: &NodeId,
    to_id: &NodeId,
) -> NodeRef {
    let swap = |parent: &CauseNode| -> Option<CauseNode> {
        let from = parent.child_index(from_id)?;
        let to = parent.child_index(to_id)?;
        if from == to {
            return None;
        }
        let mut parent = parent.clone();
        parent.children_mut().swap(from, to);
        Some(parent)
    };

    let parent_id = match scope {
        SiblingScope::Categories => root.id(),
        SiblingScope::ChildrenOf(parent_id) => parent_id,
    };
    let reordered = rebuild_path(root, &|node| node.id() == parent_id, &mut |parent| {
        swap(parent).map(Arc::new)
    });
    match reordered {
        Some(updated) => updated,
        None => {
            trace!(
                from = %from_id,
                to = %to_id,
                "reorder_siblings: siblings not found, no-op"
            );
            Arc::clone(root)
        }
    }
}

/// Add `persona` to the node's tags, or remove it if already present.
#[must_use]
pub fn toggle_persona(root: &NodeRef, id: &NodeId, persona: &PersonaId) -> NodeRef {
    update_node(root, id, |node| {
        let mut node = node.clone();
        let tags = node.persona_ids_mut();
        match tags.iter().position(|p| p == persona) {
            Some(idx) => {
                tags.remove(idx);
            }
            None => tags.push(persona.clone()),
        }
        node
    })
}

/// Remove `persona` from every node that references it.
///
/// Subtrees without a reference are shared unchanged; if no node references
/// the persona the input root is returned.
#[must_use]
pub fn strip_persona(root: &NodeRef, persona: &PersonaId) -> NodeRef {
    fn strip(node: &NodeRef, persona: &PersonaId) -> Option<NodeRef> {
        let mut rebuilt: Option<CauseNode> = None;
        for (idx, child) in node.children().iter().enumerate() {
            if let Some(new_child) = strip(child, persona) {
                rebuilt.get_or_insert_with(|| node.as_ref().clone()).children_mut()[idx] =
                    new_child;
            }
        }
        if node.has_persona(persona) {
            rebuilt
                .get_or_insert_with(|| node.as_ref().clone())
                .persona_ids_mut()
                .retain(|p| p != persona);
        }
        rebuilt.map(Arc::new)
    }

    strip(root, persona).unwrap_or_else(|| Arc::clone(root))
}

/// Rebuild the path from `node` to the first node matching `is_target`
/// (pre-order), replacing that node with `edit(target)`.
///
/// Returns `None` when no node matches or `edit` declines the change.
fn rebuild_path(
    node: &NodeRef,
    is_target: &dyn Fn(&CauseNode) -> bool,
    edit: &mut dyn FnMut(&CauseNode) -> Option<NodeRef>,
) -> Option<NodeRef> {
    if is_target(node) {
        return edit(node);
    }
    for (idx, child) in node.children().iter().enumerate() {
        if let Some(new_child) = rebuild_path(child, is_target, edit) {
            let mut parent = node.as_ref().clone();
            parent.children_mut()[idx] = new_child;
            return Some(Arc::new(parent));
        }
    }
    None
}
