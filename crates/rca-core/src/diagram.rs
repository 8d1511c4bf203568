#![forbid(unsafe_code)]

//! Diagram-level data: the owning [`Diagram`], personas, priorities, and the
//! cause bank templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, PersonaId};
use crate::node::{CauseNode, NodeRef, create_node};
use crate::tree;

/// Label given to categories created from the fishbone.
pub const DEFAULT_CATEGORY_LABEL: &str = "New category";
/// Label given to causes created under a category.
pub const DEFAULT_CAUSE_LABEL: &str = "New cause";
/// Label given to sub-causes created from the why-tree.
pub const DEFAULT_WHY_LABEL: &str = "Why?";
/// Fallback used when a committed label is empty.
pub const UNTITLED_LABEL: &str = "Untitled";
/// Root label shown when the problem statement is blank.
pub const DEFAULT_PROBLEM_LABEL: &str = "Problem";

/// A stakeholder perspective that causes can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Persona identifier referenced from [`CauseNode::persona_ids`].
    pub id: PersonaId,
    /// Display name, e.g. "Community Health Worker".
    pub name: String,
    /// Hex color used to tint tagged nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional free-form context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Persona {
    /// Create a persona with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonaId::generate(),
            name: name.into(),
            color: None,
            description: None,
        }
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Priority attached to a node or an intervention bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    /// All levels, lowest first.
    pub const ALL: [PriorityLevel; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown priority level: {s}"))
    }
}

/// A reusable cause label offered by the cause bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseTemplate {
    pub id: String,
    pub label: String,
}

impl CauseTemplate {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// The templates shipped with the editor.
    #[must_use]
    pub fn defaults() -> Vec<CauseTemplate> {
        vec![
            Self::new("t1", "High staff turnover"),
            Self::new("t2", "Limited CHW availability"),
            Self::new("t3", "Unreliable microplanning"),
            Self::new("t4", "Supply stockouts"),
            Self::new("t5", "Poor supervision"),
        ]
    }

    /// Templates whose label contains `query` (case-insensitive).
    #[must_use]
    pub fn filter<'a>(templates: &'a [CauseTemplate], query: &str) -> Vec<&'a CauseTemplate> {
        let query = query.to_lowercase();
        templates
            .iter()
            .filter(|t| t.label.to_lowercase().contains(&query))
            .collect()
    }
}

/// A root-cause diagram: a title, exactly one root, and its personas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: String,
    pub title: String,
    pub root: NodeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<Persona>,
}

impl Diagram {
    /// A diagram with an empty problem statement and no categories.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: "diag-1".into(),
            title: title.into(),
            root: CauseNode::new("root", "Describe the problem").into_ref(),
            personas: Vec::new(),
        }
    }

    /// The seed diagram a fresh editor opens with.
    #[must_use]
    pub fn starter() -> Self {
        let root = CauseNode::new("root", "Describe the problem")
            .with_child(
                create_node("Workforce")
                    .with_child(create_node("High staff turnover"))
                    .with_child(create_node("Limited CHW availability")),
            )
            .with_child(create_node("Supply").with_child(create_node("Cold chain stockouts")))
            .with_child(create_node("Planning").with_child(create_node("Unreliable microplanning")));
        Self {
            root: root.into_ref(),
            ..Self::new("New RCA Diagram")
        }
    }

    /// The root's children.
    #[must_use]
    pub fn categories(&self) -> &[NodeRef] {
        self.root.children()
    }

    /// Whether `id` names a category.
    #[must_use]
    pub fn is_category(&self, id: &NodeId) -> bool {
        self.root.child_index(id).is_some()
    }

    /// Look up a persona.
    #[must_use]
    pub fn persona(&self, id: &PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| &p.id == id)
    }

    /// Add a persona, returning its id.
    pub fn add_persona(&mut self, persona: Persona) -> PersonaId {
        let id = persona.id.clone();
        self.personas.push(persona);
        id
    }

    /// Apply `edit` to the persona with `id`. Returns `false` if absent.
    pub fn update_persona(&mut self, id: &PersonaId, edit: impl FnOnce(&mut Persona)) -> bool {
        match self.personas.iter_mut().find(|p| &p.id == id) {
            Some(persona) => {
                edit(persona);
                true
            }
            None => false,
        }
    }

    /// Remove a persona and strip its id from every node that referenced it.
    pub fn remove_persona(&mut self, id: &PersonaId) -> Option<Persona> {
        let idx = self.personas.iter().position(|p| &p.id == id)?;
        let removed = self.personas.remove(idx);
        self.root = tree::strip_persona(&self.root, id);
        Some(removed)
    }

    /// Personas a node is tagged with, skipping ids that no longer resolve.
    #[must_use]
    pub fn personas_of<'a>(&'a self, node: &'a CauseNode) -> Vec<&'a Persona> {
        node.persona_ids()
            .iter()
            .filter_map(|id| self.persona(id))
            .collect()
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::starter()
    }
}
