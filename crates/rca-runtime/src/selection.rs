#![forbid(unsafe_code)]

//! Selection and focus across the fishbone and why-tree views.
//!
//! Two ids are tracked:
//! - `selected`: the highlighted node, which side panels (notes, priority,
//!   personas) and the cause bank act on;
//! - `focus`: the root of the subtree the why-tree view renders.
//!
//! Selecting node X always selects it. Focus follows this table:
//!
//! | X is a...           | click in fishbone | click in why-tree |
//! |---------------------|-------------------|-------------------|
//! | root                | unchanged         | unchanged         |
//! | category            | focus := X        | focus := X        |
//! | first-level cause   | focus := X        | unchanged         |
//! | deeper sub-cause    | unchanged         | unchanged         |

use rca_core::ids::NodeId;
use rca_core::node::NodeRef;
use rca_core::tree::{self, NodeRole};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// View a click came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOrigin {
    Fishbone,
    WhyTree,
}

/// Selected node and why-tree focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub selected: Option<NodeId>,
    pub focus: Option<NodeId>,
}

impl Selection {
    /// Selection state after the user clicks `id` in `origin`.
    ///
    /// Ids that are not in `root` leave the state unchanged.
    #[must_use]
    pub fn select(&self, root: &NodeRef, id: &NodeId, origin: ClickOrigin) -> Selection {
        let Some(role) = tree::role_of(root, id) else {
            trace!(%id, "select ignored: unknown node");
            return self.clone();
        };

        let refocus = match (role, origin) {
            (NodeRole::Category, _) => true,
            (NodeRole::Cause, ClickOrigin::Fishbone) => true,
            (NodeRole::Cause, ClickOrigin::WhyTree) => false,
            (NodeRole::Root | NodeRole::SubCause { .. }, _) => false,
        };

        Selection {
            selected: Some(id.clone()),
            focus: if refocus {
                Some(id.clone())
            } else {
                self.focus.clone()
            },
        }
    }

    /// Drop both references.
    #[must_use]
    pub fn cleared() -> Selection {
        Selection::default()
    }

    /// Clear any reference to an id in `removed`.
    #[must_use]
    pub fn forget(&self, removed: &[NodeId]) -> Selection {
        let keep = |id: &Option<NodeId>| id.clone().filter(|id| !removed.contains(id));
        Selection {
            selected: keep(&self.selected),
            focus: keep(&self.focus),
        }
    }

    /// Drop references that no longer resolve in `root`.
    #[must_use]
    pub fn reconcile(&self, root: &NodeRef) -> Selection {
        let keep = |id: &Option<NodeId>| id.clone().filter(|id| tree::contains(root, id));
        Selection {
            selected: keep(&self.selected),
            focus: keep(&self.focus),
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Root of the why-tree view: the focused node, unless focus is unset,
    /// stale, or the diagram root itself.
    #[must_use]
    pub fn why_tree_root<'a>(&self, root: &'a NodeRef) -> Option<&'a NodeRef> {
        let focus = self.focus.as_ref()?;
        if focus == root.id() {
            return None;
        }
        tree::find_node(root, focus)
    }
}
