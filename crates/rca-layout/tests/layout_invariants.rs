//! Property-based invariant tests for the geometry engines.
//!
//! 1. Fishbone: cause boxes within a category never overlap.
//! 2. Fishbone: nothing owned by category *i* overlaps category *i + 1*.
//! 3. Fishbone: the canvas contains every box.
//! 4. Why-tree: cards at the same level never overlap.
//! 5. Why-tree: a parent's x lies within its children's combined span.
//! 6. Why-tree: levels never overlap vertically.
//! 7. Both engines are deterministic.

use proptest::prelude::*;
use rca_core::NodeId;
use rca_core::node::{CauseNode, NodeRef};
use rca_layout::{FishboneConfig, WhyTreeConfig, compute_fishbone, compute_why_tree};

const EPS: f64 = 1e-9;

// ── Strategies ──────────────────────────────────────────────────────────

fn label() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z]{1,12}",
        "[A-Za-z ]{0,90}",
        "[a-z]{30,70}",
    ]
}

/// A root with up to six categories, each with up to six causes.
fn fishbone_tree() -> impl Strategy<Value = NodeRef> {
    prop::collection::vec((label(), prop::collection::vec(label(), 0..6)), 0..6).prop_map(|cats| {
        cats.into_iter()
            .enumerate()
            .fold(CauseNode::new("root", "Problem"), |root, (i, (cat, causes))| {
                let node = causes
                    .into_iter()
                    .enumerate()
                    .fold(CauseNode::new(format!("c{i}"), cat), |c, (j, cause)| {
                        c.with_child(CauseNode::new(format!("c{i}-{j}"), cause))
                    });
                root.with_child(node)
            })
            .into_ref()
    })
}

/// Random tree of up to 30 nodes with random labels.
fn why_tree() -> impl Strategy<Value = NodeRef> {
    (prop::collection::vec(0usize..64, 0..30), prop::collection::vec(label(), 31))
        .prop_map(|(parents, labels)| {
            let count = parents.len() + 1;
            let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
            for (i, p) in parents.iter().enumerate() {
                children[p % (i + 1)].push(i + 1);
            }
            fn build(idx: usize, children: &[Vec<usize>], labels: &[String]) -> CauseNode {
                children[idx].iter().fold(
                    CauseNode::new(format!("n{idx}"), labels[idx].clone()),
                    |node, &child| node.with_child(build(child, children, labels)),
                )
            }
            build(0, &children, &labels).into_ref()
        })
}

// ═════════════════════════════════════════════════════════════════════════
// Fishbone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fishbone_causes_do_not_overlap(root in fishbone_tree()) {
        let layout = compute_fishbone(&root, &FishboneConfig::default());
        for cat in &layout.categories {
            for (i, a) in cat.causes.iter().enumerate() {
                for b in &cat.causes[i + 1..] {
                    prop_assert!(!a.rect.overlaps_vertically(&b.rect), "{} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn fishbone_neighbours_do_not_overlap(root in fishbone_tree()) {
        let layout = compute_fishbone(&root, &FishboneConfig::default());
        for pair in layout.categories.windows(2) {
            let upper_bottom = pair[0].footprint().bottom();
            for rect in pair[1].boxes() {
                prop_assert!(rect.top() >= upper_bottom - EPS);
            }
            prop_assert!(!pair[0].footprint().overlaps(&pair[1].rect));
        }
    }

    #[test]
    fn fishbone_canvas_contains_everything(root in fishbone_tree()) {
        let layout = compute_fishbone(&root, &FishboneConfig::default());
        prop_assert!(layout.height >= 600.0);
        prop_assert!(layout.width >= 500.0);
        for cat in &layout.categories {
            for rect in cat.boxes() {
                prop_assert!(rect.top() >= 0.0);
                prop_assert!(rect.bottom() <= layout.height);
                prop_assert!(rect.right() <= layout.width);
            }
        }
        prop_assert!(layout.spine.bottom >= layout.spine.top);
    }

    #[test]
    fn fishbone_is_deterministic(root in fishbone_tree()) {
        let cfg = FishboneConfig::default();
        prop_assert_eq!(compute_fishbone(&root, &cfg), compute_fishbone(&root, &cfg));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Why-tree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn why_tree_same_level_cards_do_not_overlap(root in why_tree()) {
        let layout = compute_why_tree(&root, &WhyTreeConfig::default());
        for band in &layout.levels {
            let level: Vec<_> = layout.level(band.depth).collect();
            for (i, a) in level.iter().enumerate() {
                for b in &level[i + 1..] {
                    prop_assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn why_tree_parent_within_children_span(root in why_tree()) {
        let layout = compute_why_tree(&root, &WhyTreeConfig::default());
        for node in &layout.nodes {
            let kids: Vec<_> = layout.children_of(&node.id).collect();
            if kids.is_empty() {
                continue;
            }
            let lo = kids.iter().map(|k| k.x()).fold(f64::INFINITY, f64::min);
            let hi = kids.iter().map(|k| k.x()).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(node.x() >= lo - EPS && node.x() <= hi + EPS);
            if let [only] = kids[..] {
                prop_assert!((node.x() - only.x()).abs() < EPS);
            }
        }
    }

    #[test]
    fn why_tree_levels_stack(root in why_tree()) {
        let cfg = WhyTreeConfig::default();
        let layout = compute_why_tree(&root, &cfg);
        for pair in layout.levels.windows(2) {
            prop_assert!(pair[1].top >= pair[0].bottom + cfg.level_gap - EPS);
        }
        for node in &layout.nodes {
            let band = layout.levels[node.depth];
            prop_assert!(node.rect.top() >= band.top - EPS);
            prop_assert!(node.rect.bottom() <= band.bottom + EPS);
            prop_assert!(node.rect.left() >= -EPS);
            prop_assert!(node.rect.right() <= layout.width + EPS);
        }
    }

    #[test]
    fn why_tree_is_deterministic(root in why_tree()) {
        let cfg = WhyTreeConfig::default();
        prop_assert_eq!(compute_why_tree(&root, &cfg), compute_why_tree(&root, &cfg));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Fixtures
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn long_cause_stack_pushes_following_category() {
    let long = "Health workers are not trained to read the fridge temperature log and report excursions";
    let workforce = (0..5).fold(CauseNode::new("workforce", "Workforce"), |c, i| {
        c.with_child(CauseNode::new(format!("w{i}"), long))
    });
    let root = CauseNode::new("root", "Low coverage")
        .with_child(workforce)
        .with_child(CauseNode::new("supply", "Supply").with_child(CauseNode::new("s0", "Stockouts")))
        .with_child(CauseNode::new("planning", "Planning"))
        .into_ref();

    let layout = compute_fishbone(&root, &FishboneConfig::default());
    let [workforce, supply, planning] = &layout.categories[..] else {
        panic!("expected three categories");
    };

    // Without the push Supply would sit at y = 290, inside Workforce's stack.
    assert!(supply.shift > 0.0);
    assert!(supply.rect.top() >= workforce.footprint().bottom());
    assert!(planning.rect.top() >= supply.footprint().bottom());
    // The accumulated offset carries over to Planning.
    assert!(planning.rect.center().y - supply.rect.center().y >= 120.0 - EPS);

    for (i, a) in workforce.causes.iter().enumerate() {
        for b in &workforce.causes[i + 1..] {
            assert!(a.rect.bottom() <= b.rect.top() || b.rect.bottom() <= a.rect.top());
        }
    }
}

#[test]
fn parent_centred_over_three_uneven_children() {
    // a: leaf, b: two children, c: three children.
    let root = CauseNode::new("p", "Why are doses wasted?")
        .with_child(CauseNode::new("a", "Vials opened late"))
        .with_child(
            CauseNode::new("b", "Session cancelled")
                .with_child(CauseNode::new("b1", "No transport"))
                .with_child(CauseNode::new("b2", "Staff absent")),
        )
        .with_child(
            CauseNode::new("c", "Low turnout")
                .with_child(CauseNode::new("c1", "Not announced"))
                .with_child(CauseNode::new("c2", "Market day"))
                .with_child(CauseNode::new("c3", "Rain")),
        )
        .into_ref();

    let layout = compute_why_tree(&root, &WhyTreeConfig::default());
    let x = |id: &str| layout.node(&NodeId::new(id)).map(|n| n.x()).unwrap_or(f64::NAN);

    assert!(x("p") > x("a") && x("p") < x("c"));
    assert!((x("b") - (x("b1") + x("b2")) / 2.0).abs() < EPS);
    assert!((x("c") - x("c2")).abs() < EPS);
    assert!(x("a") < x("b") && x("b") < x("c"));
}
