#![forbid(unsafe_code)]

//! Theory-of-Change intervention bundles.
//!
//! Bundles reference causes by id only. A cause may be deleted from the tree
//! while a bundle still lists it; readers resolve ids against the current tree
//! and silently drop the ones that no longer exist. The tree engine never
//! cascades into bundles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagram::PriorityLevel;
use crate::ids::{BundleId, NodeId};
use crate::node::NodeRef;
use crate::tree;

/// Optional gender/equity focus of an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderFocus {
    #[default]
    None,
    Women,
    Men,
    Adolescents,
    Caregivers,
    PeopleWithDisabilities,
    Other,
}

/// An activity with the actors responsible for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub actors: Vec<String>,
}

/// Assumptions recorded per logic-chain column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub inputs: Vec<String>,
    pub activities: Vec<String>,
    pub outputs: Vec<String>,
    pub outcomes: Vec<String>,
}

/// An intervention bundle anchored to a set of causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TocBundle {
    pub id: BundleId,
    pub name: String,
    pub description: String,
    pub cause_ids: Vec<NodeId>,
    pub inputs: Vec<String>,
    pub activities: Vec<ActivityItem>,
    pub outputs: Vec<String>,
    pub outcomes: Vec<String>,
    pub assumptions: Assumptions,
    pub risks: String,
    pub gender: GenderFocus,
    pub gender_notes: String,
    pub actors: Vec<String>,
    pub evidence: Vec<String>,
    pub priority: PriorityLevel,
}

impl Default for TocBundle {
    fn default() -> Self {
        Self {
            id: BundleId::new(""),
            name: String::new(),
            description: String::new(),
            cause_ids: Vec::new(),
            inputs: Vec::new(),
            activities: Vec::new(),
            outputs: Vec::new(),
            outcomes: Vec::new(),
            assumptions: Assumptions::default(),
            risks: String::new(),
            gender: GenderFocus::None,
            gender_notes: String::new(),
            actors: Vec::new(),
            evidence: Vec::new(),
            priority: PriorityLevel::None,
        }
    }
}

impl TocBundle {
    /// Create an empty bundle with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BundleId::generate(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Anchor a cause. Returns `false` if it was already present.
    pub fn add_cause(&mut self, id: NodeId) -> bool {
        if self.cause_ids.contains(&id) {
            return false;
        }
        self.cause_ids.push(id);
        true
    }

    /// Drop a cause anchor. Returns `false` if it was not present.
    pub fn remove_cause(&mut self, id: &NodeId) -> bool {
        let before = self.cause_ids.len();
        self.cause_ids.retain(|c| c != id);
        self.cause_ids.len() != before
    }

    /// Anchored causes that still exist in `root`, in anchor order.
    #[must_use]
    pub fn resolve_causes(&self, root: &NodeRef) -> Vec<NodeRef> {
        self.cause_ids
            .iter()
            .filter_map(|id| tree::find_node(root, id).cloned())
            .collect()
    }

    /// Anchored ids that no longer resolve against `root`.
    #[must_use]
    pub fn dangling_causes<'a>(&'a self, root: &NodeRef) -> Vec<&'a NodeId> {
        self.cause_ids
            .iter()
            .filter(|id| !tree::contains(root, id))
            .collect()
    }
}

/// All bundles of a document plus their display order and the active one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocBoard {
    #[serde(default)]
    pub toc_bundles: BTreeMap<BundleId, TocBundle>,
    #[serde(default)]
    pub active_bundle_id: Option<BundleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_order: Option<Vec<BundleId>>,
}

impl TocBoard {
    /// Insert a bundle, append it to the order, and make it active.
    pub fn insert(&mut self, bundle: TocBundle) -> BundleId {
        let id = bundle.id.clone();
        self.toc_bundles.insert(id.clone(), bundle);
        self.toc_order.get_or_insert_with(Vec::new).push(id.clone());
        self.active_bundle_id = Some(id.clone());
        id
    }

    /// Remove a bundle, its order entry, and the active pointer if it matched.
    pub fn remove(&mut self, id: &BundleId) -> Option<TocBundle> {
        let removed = self.toc_bundles.remove(id)?;
        if let Some(order) = self.toc_order.as_mut() {
            order.retain(|b| b != id);
        }
        if self.active_bundle_id.as_ref() == Some(id) {
            self.active_bundle_id = None;
        }
        Some(removed)
    }

    /// Make `id` the active bundle. Unknown ids are ignored.
    pub fn activate(&mut self, id: &BundleId) -> bool {
        if self.toc_bundles.contains_key(id) {
            self.active_bundle_id = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// The active bundle, if it resolves.
    #[must_use]
    pub fn active(&self) -> Option<&TocBundle> {
        self.active_bundle_id
            .as_ref()
            .and_then(|id| self.toc_bundles.get(id))
    }

    /// Mutable access to a bundle.
    pub fn get_mut(&mut self, id: &BundleId) -> Option<&mut TocBundle> {
        self.toc_bundles.get_mut(id)
    }

    /// Bundles in display order: explicit order first (dangling entries
    /// skipped), then any bundle missing from the order by id.
    #[must_use]
    pub fn ordered(&self) -> Vec<&TocBundle> {
        let order = self.toc_order.as_deref().unwrap_or_default();
        let mut out: Vec<&TocBundle> = order
            .iter()
            .filter_map(|id| self.toc_bundles.get(id))
            .collect();
        out.extend(
            self.toc_bundles
                .values()
                .filter(|bundle| !order.contains(&bundle.id)),
        );
        out
    }

    /// Swap two bundles in the display order. No-op unless both are present.
    pub fn reorder(&mut self, from: &BundleId, to: &BundleId) -> bool {
        let Some(order) = self.toc_order.as_mut() else {
            return false;
        };
        let (Some(a), Some(b)) = (
            order.iter().position(|id| id == from),
            order.iter().position(|id| id == to),
        ) else {
            return false;
        };
        order.swap(a, b);
        a != b
    }
}
