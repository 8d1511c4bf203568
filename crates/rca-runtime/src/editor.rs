#![forbid(unsafe_code)]

//! Editor state and the command reducer.
//!
//! All user intent arrives as a [`Command`]. [`reduce`] is a pure function
//! from `(state, command)` to the next state; [`Editor`] wraps it with the
//! derived layouts and viewports a front end renders from.
//!
//! # Invariants
//!
//! - The diagram always has a root; deleting it is a no-op.
//! - Deleting a node purges it and every descendant from the notes and
//!   priority maps, and clears `selected`/`focus` if they pointed into the
//!   deleted subtree. ToC bundles keep their anchors (dangling ids are
//!   filtered when resolved).
//! - While the fishbone is locked, structural commands from the fishbone
//!   (add category, add cause, reorder, and rename/delete with fishbone
//!   origin) are ignored. Selection is unaffected.
//! - A command naming an unknown id is a no-op.

use std::collections::BTreeMap;
use std::sync::Arc;

use rca_core::diagram::{
    CauseTemplate, DEFAULT_CATEGORY_LABEL, DEFAULT_CAUSE_LABEL, DEFAULT_WHY_LABEL, Diagram,
    Persona, PriorityLevel, UNTITLED_LABEL,
};
use rca_core::ids::{BundleId, NodeId, PersonaId};
use rca_core::node::create_node;
use rca_core::toc::{TocBoard, TocBundle};
use rca_core::tree::{self, SiblingScope};
use rca_layout::{
    FishboneConfig, FishboneLayout, Viewport, ViewportLimits, WhyTreeConfig, WhyTreeLayout,
    compute_fishbone, compute_why_tree,
};
use tracing::{debug, trace};

use crate::document::{Document, DocumentResult};
use crate::selection::{ClickOrigin, Selection};
use crate::storage::DocumentStore;

// ─────────────────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────────────────

/// The complete editor state.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub diagram: Diagram,
    pub notes: BTreeMap<NodeId, String>,
    pub priorities: BTreeMap<NodeId, PriorityLevel>,
    pub toc: TocBoard,
    pub selection: Selection,
    pub fishbone_locked: bool,
    pub templates: Vec<CauseTemplate>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_document(Document::default())
    }
}

impl EditorState {
    /// Fresh state around a loaded document. Selection starts empty.
    #[must_use]
    pub fn from_document(doc: Document) -> Self {
        Self {
            diagram: doc.diagram,
            notes: doc.notes_by_node,
            priorities: doc.priority_by_node,
            toc: doc.toc,
            selection: Selection::default(),
            fishbone_locked: false,
            templates: CauseTemplate::defaults(),
        }
    }

    /// Snapshot of the persisted parts.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document {
            format_version: Some(Document::FORMAT_VERSION),
            diagram: self.diagram.clone(),
            notes_by_node: self.notes.clone(),
            priority_by_node: self.priorities.clone(),
            toc: self.toc.clone(),
        }
    }

    /// State after importing `text`, or the error that rejected it.
    ///
    /// Selection is dropped and the lock and templates are kept.
    pub fn import(&self, text: &str) -> DocumentResult<EditorState> {
        let doc = Document::from_json(text)?;
        Ok(Self {
            fishbone_locked: self.fishbone_locked,
            templates: self.templates.clone(),
            ..Self::from_document(doc)
        })
    }

    /// Note attached to `id`, or `""`.
    #[must_use]
    pub fn note(&self, id: &NodeId) -> &str {
        self.notes.get(id).map_or("", String::as_str)
    }

    /// Priority of `id`; `None` when unset.
    #[must_use]
    pub fn priority(&self, id: &NodeId) -> PriorityLevel {
        self.priorities.get(id).copied().unwrap_or_default()
    }

    /// Note of the selected node, or `""`.
    #[must_use]
    pub fn current_note(&self) -> &str {
        self.selection.selected.as_ref().map_or("", |id| self.note(id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Every state change the editor accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a category (fishbone).
    AddCategory,
    /// Append a cause under `category` (fishbone).
    AddCause { category: NodeId },
    /// Append a "why" under `parent` (why-tree).
    AddWhy { parent: NodeId },
    /// Append a child labelled from a cause-bank template under the selected node.
    InsertTemplate { template: String },
    /// Commit a label edit. Empty labels become "Untitled".
    Rename {
        id: NodeId,
        label: String,
        origin: ClickOrigin,
    },
    Delete { id: NodeId, origin: ClickOrigin },
    ReorderCategories { from: NodeId, to: NodeId },
    ReorderCauses {
        category: NodeId,
        from: NodeId,
        to: NodeId,
    },
    Select { id: NodeId, origin: ClickOrigin },
    ClearSelection,
    /// Set a note; empty text removes it.
    SetNote { id: NodeId, text: String },
    /// Set a priority; `None` removes it.
    SetPriority {
        id: NodeId,
        priority: PriorityLevel,
    },
    SetTitle(String),
    AddPersona(Persona),
    RenamePersona { id: PersonaId, name: String },
    RemovePersona(PersonaId),
    TogglePersona { node: NodeId, persona: PersonaId },
    /// Insert a bundle, append it to the order, and activate it.
    AddBundle(TocBundle),
    RemoveBundle(BundleId),
    ActivateBundle(BundleId),
    AnchorCause { bundle: BundleId, cause: NodeId },
    UnanchorCause { bundle: BundleId, cause: NodeId },
    ReorderBundles { from: BundleId, to: BundleId },
    SetFishboneLocked(bool),
}

impl Command {
    /// Whether the fishbone lock suppresses this command.
    #[must_use]
    pub fn is_fishbone_edit(&self) -> bool {
        match self {
            Command::AddCategory
            | Command::AddCause { .. }
            | Command::ReorderCategories { .. }
            | Command::ReorderCauses { .. } => true,
            Command::Rename { origin, .. } | Command::Delete { origin, .. } => {
                *origin == ClickOrigin::Fishbone
            }
            _ => false,
        }
    }
}

/// Apply `cmd` to `state`.
#[must_use]
pub fn reduce(state: &EditorState, cmd: Command) -> EditorState {
    if state.fishbone_locked && cmd.is_fishbone_edit() {
        trace!(?cmd, "ignored: fishbone locked");
        return state.clone();
    }

    let mut next = state.clone();
    let root = &state.diagram.root;

    match cmd {
        Command::AddCategory => {
            next.diagram.root = tree::insert_child(root, root.id(), create_node(DEFAULT_CATEGORY_LABEL));
        }
        Command::AddCause { category } => {
            next.diagram.root = tree::add_child_node(root, &category, DEFAULT_CAUSE_LABEL);
        }
        Command::AddWhy { parent } => {
            next.diagram.root = tree::add_child_node(root, &parent, DEFAULT_WHY_LABEL);
        }
        Command::InsertTemplate { template } => {
            let Some(parent) = state.selection.selected.as_ref() else {
                trace!("insert template ignored: nothing selected");
                return next;
            };
            let Some(t) = state.templates.iter().find(|t| t.id == template) else {
                trace!(%template, "insert template ignored: unknown template");
                return next;
            };
            next.diagram.root = tree::add_child_node(root, parent, t.label.clone());
        }
        Command::Rename { id, label, .. } => {
            let label = if label.trim().is_empty() {
                UNTITLED_LABEL.to_string()
            } else {
                label
            };
            next.diagram.root = tree::rename_node(root, &id, label);
        }
        Command::Delete { id, .. } => {
            let removed = tree::subtree_ids(root, &id);
            let after = tree::delete_node(root, &id);
            if Arc::ptr_eq(root, &after) {
                return next;
            }
            for gone in &removed {
                next.notes.remove(gone);
                next.priorities.remove(gone);
            }
            next.selection = state.selection.forget(&removed);
            next.diagram.root = after;
            debug!(node_id = %id, removed = removed.len(), "node deleted");
        }
        Command::ReorderCategories { from, to } => {
            next.diagram.root = tree::reorder_siblings(root, &SiblingScope::Categories, &from, &to);
        }
        Command::ReorderCauses { category, from, to } => {
            next.diagram.root =
                tree::reorder_siblings(root, &SiblingScope::ChildrenOf(category), &from, &to);
        }
        Command::Select { id, origin } => {
            next.selection = state.selection.select(root, &id, origin);
        }
        Command::ClearSelection => {
            next.selection = Selection::cleared();
        }
        Command::SetNote { id, text } => {
            if !tree::contains(root, &id) {
                trace!(node_id = %id, "note ignored: unknown node");
            } else if text.is_empty() {
                next.notes.remove(&id);
            } else {
                next.notes.insert(id, text);
            }
        }
        Command::SetPriority { id, priority } => {
            if !tree::contains(root, &id) {
                trace!(node_id = %id, "priority ignored: unknown node");
            } else if priority == PriorityLevel::None {
                next.priorities.remove(&id);
            } else {
                next.priorities.insert(id, priority);
            }
        }
        Command::SetTitle(title) => {
            next.diagram.title = title;
        }
        Command::AddPersona(persona) => {
            next.diagram.add_persona(persona);
        }
        Command::RenamePersona { id, name } => {
            next.diagram.update_persona(&id, |p| p.name = name);
        }
        Command::RemovePersona(id) => {
            next.diagram.remove_persona(&id);
        }
        Command::TogglePersona { node, persona } => {
            if next.diagram.persona(&persona).is_some() {
                next.diagram.root = tree::toggle_persona(root, &node, &persona);
            } else {
                trace!(persona_id = %persona, "toggle ignored: unknown persona");
            }
        }
        Command::AddBundle(bundle) => {
            next.toc.insert(bundle);
        }
        Command::RemoveBundle(id) => {
            next.toc.remove(&id);
        }
        Command::ActivateBundle(id) => {
            next.toc.activate(&id);
        }
        Command::AnchorCause { bundle, cause } => {
            if !tree::contains(root, &cause) {
                trace!(node_id = %cause, "anchor ignored: unknown node");
            } else if let Some(b) = next.toc.get_mut(&bundle) {
                b.add_cause(cause);
            }
        }
        Command::UnanchorCause { bundle, cause } => {
            if let Some(b) = next.toc.get_mut(&bundle) {
                b.remove_cause(&cause);
            }
        }
        Command::ReorderBundles { from, to } => {
            next.toc.reorder(&from, &to);
        }
        Command::SetFishboneLocked(locked) => {
            next.fishbone_locked = locked;
        }
    }

    next
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor
// ─────────────────────────────────────────────────────────────────────────────

/// Editor state plus layout configuration and per-view viewports.
#[derive(Debug, Clone)]
pub struct Editor {
    state: EditorState,
    fishbone_config: FishboneConfig,
    why_tree_config: WhyTreeConfig,
    pub fishbone_view: Viewport,
    pub why_tree_view: Viewport,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            fishbone_config: FishboneConfig::default(),
            why_tree_config: WhyTreeConfig::default(),
            fishbone_view: Viewport::new(ViewportLimits::FISHBONE),
            why_tree_view: Viewport::new(ViewportLimits::WHY_TREE),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, fishbone: FishboneConfig, why_tree: WhyTreeConfig) -> Self {
        self.fishbone_config = fishbone;
        self.why_tree_config = why_tree;
        self
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply a command. Returns whether the state changed.
    pub fn update(&mut self, cmd: Command) -> bool {
        let next = reduce(&self.state, cmd);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Apply commands in order. Returns how many changed the state.
    pub fn update_all(&mut self, cmds: impl IntoIterator<Item = Command>) -> usize {
        cmds.into_iter()
            .map(|cmd| self.update(cmd))
            .filter(|&changed| changed)
            .count()
    }

    /// Replace the state with an imported document. On error the current
    /// state is kept and the error returned.
    pub fn import_json(&mut self, text: &str) -> DocumentResult<()> {
        self.state = self.state.import(text)?;
        self.why_tree_view.reset();
        Ok(())
    }

    pub fn export_json(&self) -> DocumentResult<String> {
        self.state.to_document().to_json_pretty()
    }

    pub fn save(&self, store: &dyn DocumentStore) -> DocumentResult<()> {
        store.save(&self.state.to_document())
    }

    /// Load from `store`. Returns `false` when it holds nothing. Like
    /// [`Editor::import_json`], a successful load resets the why-tree view.
    pub fn load(&mut self, store: &dyn DocumentStore) -> DocumentResult<bool> {
        match store.load()? {
            Some(doc) => {
                self.state = EditorState {
                    fishbone_locked: self.state.fishbone_locked,
                    templates: self.state.templates.clone(),
                    ..EditorState::from_document(doc)
                };
                self.why_tree_view.reset();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fishbone geometry for the current diagram.
    #[must_use]
    pub fn fishbone_layout(&self) -> FishboneLayout {
        compute_fishbone(&self.state.diagram.root, &self.fishbone_config)
    }

    /// Why-tree geometry for the focused subtree, if anything is focused.
    #[must_use]
    pub fn why_tree_layout(&self) -> Option<WhyTreeLayout> {
        self.state
            .selection
            .why_tree_root(&self.state.diagram.root)
            .map(|focus| compute_why_tree(focus, &self.why_tree_config))
    }

    /// Cause-bank templates matching `query` (case-insensitive).
    #[must_use]
    pub fn templates_matching(&self, query: &str) -> Vec<&CauseTemplate> {
        CauseTemplate::filter(&self.state.templates, query)
    }
}
