//! End-to-end editor scenarios and reducer invariants.
//!
//! Properties checked for arbitrary command sequences:
//!
//! 1. The diagram always has its original root.
//! 2. Every note and priority key names a node in the tree.
//! 3. `selected` and `focus` are either unset or resolve in the tree.
//! 4. While locked, fishbone-origin structural commands leave the tree alone.

use proptest::prelude::*;
use rca_core::node::CauseNode;
use rca_core::tree;
use rca_core::{Diagram, NodeId, PriorityLevel};
use rca_runtime::{
    ClickOrigin, Command, Document, DocumentError, DocumentStore, Editor, EditorState,
    MemoryStore, reduce,
};

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn coverage_state() -> EditorState {
    let root = CauseNode::new("root", "Low immunisation coverage")
        .with_child(
            CauseNode::new("supply", "Supply").with_child(
                CauseNode::new("cold", "Cold chain stockouts")
                    .with_child(CauseNode::new("gen", "No generator")),
            ),
        )
        .with_child(
            CauseNode::new("workforce", "Workforce")
                .with_child(CauseNode::new("a", "A"))
                .with_child(CauseNode::new("b", "B"))
                .with_child(CauseNode::new("c", "C")),
        )
        .into_ref();
    EditorState::from_document(Document::new(Diagram {
        root,
        ..Diagram::new("Coverage")
    }))
}

// ═════════════════════════════════════════════════════════════════════════
// Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn click_through_fishbone_into_why_tree() {
    let mut editor = Editor::new(coverage_state());

    editor.update(Command::Select { id: id("supply"), origin: ClickOrigin::Fishbone });
    let sel = &editor.state().selection;
    assert_eq!((sel.selected.clone(), sel.focus.clone()), (Some(id("supply")), Some(id("supply"))));

    editor.update(Command::Select { id: id("cold"), origin: ClickOrigin::Fishbone });
    let sel = &editor.state().selection;
    assert_eq!((sel.selected.clone(), sel.focus.clone()), (Some(id("cold")), Some(id("cold"))));

    editor.update(Command::Select { id: id("gen"), origin: ClickOrigin::WhyTree });
    let sel = &editor.state().selection;
    assert_eq!(sel.selected, Some(id("gen")));
    assert_eq!(sel.focus, Some(id("cold")));

    let why = editor.why_tree_layout().unwrap();
    assert_eq!(why.nodes[0].id, id("cold"));
}

#[test]
fn reorder_swaps_first_and_last() {
    let s = reduce(
        &coverage_state(),
        Command::ReorderCauses { category: id("workforce"), from: id("a"), to: id("c") },
    );
    let order: Vec<_> = tree::find_node(&s.diagram.root, &id("workforce"))
        .unwrap()
        .children()
        .iter()
        .map(|n| n.id().as_str().to_string())
        .collect();
    assert_eq!(order, ["c", "b", "a"]);

    let same = reduce(
        &s,
        Command::ReorderCauses { category: id("workforce"), from: id("a"), to: id("zzz") },
    );
    assert!(std::sync::Arc::ptr_eq(&same.diagram.root, &s.diagram.root));
}

#[test]
fn importing_empty_object_is_rejected() {
    let mut editor = Editor::new(coverage_state());
    let before = editor.state().clone();
    let err = editor.import_json("{}").unwrap_err();
    assert!(matches!(err, DocumentError::MissingRoot));
    assert_eq!(editor.state(), &before);
}

#[test]
fn deleting_category_purges_descendant_annotations() {
    let mut editor = Editor::new(coverage_state());
    editor.update_all([
        Command::SetNote { id: id("gen"), text: "Ask district".into() },
        Command::SetPriority { id: id("cold"), priority: PriorityLevel::High },
        Command::SetPriority { id: id("a"), priority: PriorityLevel::Low },
        Command::Select { id: id("cold"), origin: ClickOrigin::Fishbone },
    ]);
    editor.update(Command::Delete { id: id("supply"), origin: ClickOrigin::Fishbone });

    let state = editor.state();
    assert!(state.notes.is_empty());
    assert_eq!(state.priorities.keys().collect::<Vec<_>>(), vec![&id("a")]);
    assert_eq!(state.selection.focus, None);
    assert!(editor.why_tree_layout().is_none());
    assert_eq!(editor.fishbone_layout().categories.len(), 1);
}

#[test]
fn locked_fishbone_still_allows_why_tree_edits() {
    let mut editor = Editor::new(coverage_state());
    editor.update(Command::SetFishboneLocked(true));
    assert!(!editor.update(Command::AddCategory));
    assert!(!editor.update(Command::Delete { id: id("gen"), origin: ClickOrigin::Fishbone }));
    assert!(editor.update(Command::Delete { id: id("gen"), origin: ClickOrigin::WhyTree }));
    assert!(editor.update(Command::Rename {
        id: id("cold"),
        label: "Fridge failures".into(),
        origin: ClickOrigin::WhyTree,
    }));
    editor.update(Command::SetFishboneLocked(false));
    assert!(editor.update(Command::AddCategory));
}

#[test]
fn save_and_load_through_store() {
    let store = MemoryStore::new();
    let mut editor = Editor::new(coverage_state());
    assert!(!editor.load(&store).unwrap());

    editor.update(Command::SetTitle("District review".into()));
    editor.update(Command::SetNote { id: id("supply"), text: "Stock cards".into() });
    editor.save(&store).unwrap();

    let mut other = Editor::default();
    assert!(other.load(&store).unwrap());
    assert_eq!(other.state().diagram.title, "District review");
    assert_eq!(other.state().note(&id("supply")), "Stock cards");
    assert_eq!(store.name(), "MemoryStore");
}

#[test]
fn fresh_editor_starts_from_starter_diagram() {
    let editor = Editor::default();
    let labels: Vec<_> = editor.state().diagram.categories().iter().map(|c| c.label()).collect();
    assert_eq!(labels, ["Workforce", "Supply", "Planning"]);
    assert!(editor.state().selection.selected.is_none());
    assert_eq!(editor.state().current_note(), "");
}

// ═════════════════════════════════════════════════════════════════════════
// Properties
// ═════════════════════════════════════════════════════════════════════════

const IDS: [&str; 9] = ["root", "supply", "cold", "gen", "workforce", "a", "b", "c", "ghost"];

fn any_id() -> impl Strategy<Value = NodeId> {
    prop::sample::select(IDS.to_vec()).prop_map(NodeId::new)
}

fn origin() -> impl Strategy<Value = ClickOrigin> {
    prop_oneof![Just(ClickOrigin::Fishbone), Just(ClickOrigin::WhyTree)]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::AddCategory),
        any_id().prop_map(|category| Command::AddCause { category }),
        any_id().prop_map(|parent| Command::AddWhy { parent }),
        (any_id(), "[a-z ]{0,12}", origin())
            .prop_map(|(id, label, origin)| Command::Rename { id, label, origin }),
        (any_id(), origin()).prop_map(|(id, origin)| Command::Delete { id, origin }),
        (any_id(), any_id()).prop_map(|(from, to)| Command::ReorderCategories { from, to }),
        (any_id(), origin()).prop_map(|(id, origin)| Command::Select { id, origin }),
        Just(Command::ClearSelection),
        (any_id(), "[a-z]{0,4}").prop_map(|(id, text)| Command::SetNote { id, text }),
        (any_id(), prop::sample::select(PriorityLevel::ALL.to_vec()))
            .prop_map(|(id, priority)| Command::SetPriority { id, priority }),
        any::<bool>().prop_map(Command::SetFishboneLocked),
    ]
}

proptest! {
    #[test]
    fn reducer_keeps_side_state_consistent(cmds in prop::collection::vec(command(), 0..40)) {
        let mut state = coverage_state();
        for cmd in cmds {
            state = reduce(&state, cmd);
            let root = &state.diagram.root;
            prop_assert_eq!(root.id(), &id("root"));
            for key in state.notes.keys().chain(state.priorities.keys()) {
                prop_assert!(tree::contains(root, key), "dangling annotation {}", key);
            }
            for sel in [&state.selection.selected, &state.selection.focus].into_iter().flatten() {
                prop_assert!(tree::contains(root, sel), "dangling selection {}", sel);
            }
        }
    }

    #[test]
    fn lock_freezes_fishbone_structure(cmds in prop::collection::vec(command(), 0..30)) {
        let locked = reduce(&coverage_state(), Command::SetFishboneLocked(true));
        let mut state = locked.clone();
        for cmd in cmds {
            if cmd.is_fishbone_edit() {
                let next = reduce(&state, cmd);
                prop_assert_eq!(&next, &state);
            }
        }
        prop_assert_eq!(state.diagram, locked.diagram);
    }
}
