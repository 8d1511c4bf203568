#![forbid(unsafe_code)]

//! The recursive cause node and its factory.
//!
//! A [`CauseNode`] owns its children exclusively through [`NodeRef`]
//! (`Arc<CauseNode>`), so the tree can never contain a cycle and untouched
//! subtrees can be shared between successive snapshots of the same diagram.
//!
//! # Example
//!
//! ```
//! use rca_core::node::{CauseNode, create_node};
//!
//! let root = CauseNode::new("root", "Low vaccination coverage")
//!     .with_child(CauseNode::new("supply", "Supply")
//!         .with_child(create_node("Cold chain stockouts")));
//!
//! assert_eq!(root.children().len(), 1);
//! assert_eq!(root.children()[0].children()[0].label(), "Cold chain stockouts");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, PersonaId};

/// Shared handle to an immutable node.
pub type NodeRef = Arc<CauseNode>;

/// A node in the cause tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseNode {
    id: NodeId,
    label: String,
    #[serde(default)]
    children: Vec<NodeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    persona_ids: Vec<PersonaId>,
}

/// Create a node with a fresh identifier, the given label, and no children.
#[must_use]
pub fn create_node(label: impl Into<String>) -> CauseNode {
    CauseNode::new(NodeId::generate(), label)
}

impl CauseNode {
    /// Create a leaf node with an explicit identifier.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
            persona_ids: Vec::new(),
        }
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: CauseNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Replace the child list.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeRef>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Replace the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the persona tags. Duplicates are dropped, first occurrence wins.
    #[must_use]
    pub fn with_personas(mut self, personas: impl IntoIterator<Item = PersonaId>) -> Self {
        self.persona_ids.clear();
        for persona in personas {
            if !self.persona_ids.contains(&persona) {
                self.persona_ids.push(persona);
            }
        }
        self
    }

    /// Wrap the node in a shared handle.
    #[must_use]
    pub fn into_ref(self) -> NodeRef {
        Arc::new(self)
    }

    /// The node identifier.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Persona tags in insertion order.
    #[must_use]
    pub fn persona_ids(&self) -> &[PersonaId] {
        &self.persona_ids
    }

    /// Whether the node is tagged with `persona`.
    #[must_use]
    pub fn has_persona(&self, persona: &PersonaId) -> bool {
        self.persona_ids.contains(persona)
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the direct child with `id`, if any.
    #[must_use]
    pub fn child_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|child| child.id() == id)
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Total node count of the subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }

    /// Height of the subtree (a leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeRef> {
        &mut self.children
    }

    pub(crate) fn persona_ids_mut(&mut self) -> &mut Vec<PersonaId> {
        &mut self.persona_ids
    }
}

/// Depth-first, pre-order iterator over a subtree.
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a CauseNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a CauseNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| child.as_ref()));
        Some(node)
    }
}
