#![forbid(unsafe_code)]

//! Why-tree geometry.
//!
//! Lays out an arbitrary-depth subtree top-down:
//!
//! 1. Nodes are flattened in pre-order and grouped into levels by depth.
//! 2. Subtree widths are computed bottom-up. A leaf is one card wide; an
//!    internal node spans its children's subtree widths plus the sibling gaps
//!    between them, and never less than one card.
//! 3. x is assigned top-down. A node's children are packed left to right,
//!    each centred in its own subtree width, and the whole run is centred
//!    under the parent.
//! 4. Each level starts `level_gap` below the tallest card of the level above,
//!    so wrapped labels of any length never make levels collide.
//! 5. The tree is shifted horizontally to sit centred in a canvas at least
//!    `min_width` wide.
//!
//! Because every node's children fit inside that node's own subtree-width
//! interval, intervals at one level are disjoint, and so are the cards.

use rca_core::geometry::{Point, Rect};
use rca_core::ids::NodeId;
use rca_core::node::NodeRef;
use rca_text::BoxMetrics;
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::connector::Curve;

/// Why-tree layout parameters (logical canvas units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhyTreeConfig {
    pub card: BoxMetrics,
    /// Horizontal gap between adjacent sibling subtrees.
    pub sibling_gap: f64,
    /// Vertical gap between one level's tallest card and the next level.
    pub level_gap: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    /// Total horizontal padding added around the measured extent.
    pub horizontal_padding: f64,
    pub min_width: f64,
}

impl Default for WhyTreeConfig {
    fn default() -> Self {
        Self {
            card: BoxMetrics::WHY_CARD,
            sibling_gap: 24.0,
            level_gap: 60.0,
            top_margin: 40.0,
            bottom_margin: 100.0,
            horizontal_padding: 80.0,
            min_width: 800.0,
        }
    }
}

/// A positioned card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhyNodeBox {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub lines: Vec<String>,
    pub rect: Rect,
    /// Width reserved for this node and all its descendants.
    pub subtree_width: f64,
}

impl WhyNodeBox {
    /// Horizontal centre of the card.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.rect.center().x
    }
}

/// Parent-to-child connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhyEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub curve: Curve,
}

/// Vertical band occupied by one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelBand {
    pub depth: usize,
    pub top: f64,
    pub bottom: f64,
}

/// Complete why-tree layout. `nodes` is in pre-order, root first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhyTreeLayout {
    pub nodes: Vec<WhyNodeBox>,
    pub edges: Vec<WhyEdge>,
    pub levels: Vec<LevelBand>,
    pub width: f64,
    pub height: f64,
}

impl WhyTreeLayout {
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&WhyNodeBox> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn rect_of(&self, id: &NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.rect)
    }

    /// Card under `point`, if any.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|n| n.rect.contains(point))
            .map(|n| &n.id)
    }

    /// Cards at `depth`, left to right.
    pub fn level(&self, depth: usize) -> impl Iterator<Item = &WhyNodeBox> {
        self.nodes.iter().filter(move |n| n.depth == depth)
    }

    /// Direct children of `id`, left to right.
    pub fn children_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a WhyNodeBox> {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_ref() == Some(id))
    }
}

/// Flattened pre-order entry.
struct Slot<'a> {
    node: &'a NodeRef,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

/// Lay out the subtree rooted at `focus`.
#[must_use]
pub fn compute_why_tree(focus: &NodeRef, config: &WhyTreeConfig) -> WhyTreeLayout {
    let _span = debug_span!("rca.layout.why_tree", focus = %focus.id()).entered();

    let slots = flatten(focus);
    let card_w = config.card.width;

    // Pre-order puts every child after its parent, so a reverse sweep sees
    // children first.
    let mut widths = vec![card_w; slots.len()];
    for i in (0..slots.len()).rev() {
        let kids = &slots[i].children;
        if kids.is_empty() {
            continue;
        }
        let span: f64 = kids.iter().map(|&k| widths[k]).sum::<f64>()
            + config.sibling_gap * (kids.len() - 1) as f64;
        widths[i] = span.max(card_w);
    }

    let mut xs = vec![0.0; slots.len()];
    for i in 0..slots.len() {
        let kids = &slots[i].children;
        if kids.is_empty() {
            continue;
        }
        let span: f64 = kids.iter().map(|&k| widths[k]).sum::<f64>()
            + config.sibling_gap * (kids.len() - 1) as f64;
        let mut cursor = xs[i] - span / 2.0;
        for &k in kids {
            xs[k] = cursor + widths[k] / 2.0;
            cursor += widths[k] + config.sibling_gap;
        }
    }

    let measured: Vec<_> = slots
        .iter()
        .map(|s| config.card.measure(s.node.label()))
        .collect();

    let depth_count = slots.iter().map(|s| s.depth).max().map_or(0, |d| d + 1);
    let mut levels = Vec::with_capacity(depth_count);
    let mut top = config.top_margin;
    for depth in 0..depth_count {
        let tallest = slots
            .iter()
            .zip(&measured)
            .filter(|(s, _)| s.depth == depth)
            .map(|(_, m)| m.size.height)
            .fold(0.0, f64::max);
        levels.push(LevelBand {
            depth,
            top,
            bottom: top + tallest,
        });
        top += tallest + config.level_gap;
    }

    let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min) - card_w / 2.0;
    let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max) + card_w / 2.0;
    let extent = max_x - min_x;
    let width = config.min_width.max(extent + config.horizontal_padding);
    let shift = width / 2.0 - (min_x + max_x) / 2.0;

    let nodes: Vec<WhyNodeBox> = slots
        .iter()
        .zip(measured)
        .enumerate()
        .map(|(i, (slot, m))| WhyNodeBox {
            id: slot.node.id().clone(),
            parent: slot.parent.map(|p| slots[p].node.id().clone()),
            depth: slot.depth,
            lines: m.lines,
            rect: Rect::new(
                xs[i] + shift - m.size.width / 2.0,
                levels[slot.depth].top,
                m.size.width,
                m.size.height,
            ),
            subtree_width: widths[i],
        })
        .collect();

    let edges = slots
        .iter()
        .enumerate()
        .flat_map(|(i, slot)| slot.children.iter().map(move |&k| (i, k)))
        .map(|(p, k)| WhyEdge {
            from: nodes[p].id.clone(),
            to: nodes[k].id.clone(),
            curve: Curve::vertical(nodes[p].rect.bottom_center(), nodes[k].rect.top_center()),
        })
        .collect();

    let height = levels.last().map_or(config.top_margin, |l| l.bottom) + config.bottom_margin;

    debug!(
        nodes = nodes.len(),
        levels = levels.len(),
        width,
        height,
        "why-tree layout computed"
    );

    WhyTreeLayout {
        nodes,
        edges,
        levels,
        width,
        height,
    }
}

/// Flatten `root` in pre-order with parent/child indices.
fn flatten(root: &NodeRef) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = Vec::new();
    let mut stack: Vec<(&NodeRef, Option<usize>, usize)> = vec![(root, None, 0)];
    while let Some((node, parent, depth)) = stack.pop() {
        let idx = slots.len();
        if let Some(p) = parent {
            slots[p].children.push(idx);
        }
        slots.push(Slot {
            node,
            parent,
            children: Vec::with_capacity(node.children().len()),
            depth,
        });
        for child in node.children().iter().rev() {
            stack.push((child, Some(idx), depth + 1));
        }
    }
    slots
}
