#![forbid(unsafe_code)]

//! Plain-text reports: an indented outline of the cause tree and the computed
//! geometry of both views.

use std::fmt::Write as _;

use rca::core::tree;
use rca::{CauseNode, EditorState, FishboneLayout, PriorityLevel, Rect, WhyTreeLayout};

/// Guide character styles for the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guides {
    /// ASCII guides: `|`, `+--`, `` `-- ``.
    Ascii,
    /// Unicode box-drawing characters (default).
    #[default]
    Unicode,
}

impl Guides {
    /// Vertical continuation (an ancestor has siblings below).
    #[must_use]
    pub const fn vertical(&self) -> &str {
        match self {
            Self::Ascii => "|   ",
            Self::Unicode => "\u{2502}   ",
        }
    }

    /// Branch guide (item has siblings below).
    #[must_use]
    pub const fn branch(&self) -> &str {
        match self {
            Self::Ascii => "+-- ",
            Self::Unicode => "\u{251C}\u{2500}\u{2500} ",
        }
    }

    /// Last-item guide (no siblings below).
    #[must_use]
    pub const fn last(&self) -> &str {
        match self {
            Self::Ascii => "`-- ",
            Self::Unicode => "\u{2514}\u{2500}\u{2500} ",
        }
    }

    /// Empty indentation.
    #[must_use]
    pub const fn space(&self) -> &str {
        "    "
    }
}

/// Indented outline of the whole diagram with annotation markers.
///
/// Markers after a label: `*` selected, `@` why-tree focus, `!level`
/// priority, `[note]`, and `{Persona, ...}` tags.
#[must_use]
pub fn outline(state: &EditorState, guides: Guides) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", state.diagram.title);
    let root = &state.diagram.root;
    let _ = writeln!(out, "{}{}", root.label(), markers(state, root));
    let mut prefix = String::new();
    outline_children(state, root, guides, &mut prefix, &mut out);
    out
}

fn outline_children(
    state: &EditorState,
    node: &CauseNode,
    guides: Guides,
    prefix: &mut String,
    out: &mut String,
) {
    let count = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        let last = i + 1 == count;
        let guide = if last { guides.last() } else { guides.branch() };
        let _ = writeln!(out, "{prefix}{guide}{}{}", child.label(), markers(state, child));

        let len = prefix.len();
        prefix.push_str(if last { guides.space() } else { guides.vertical() });
        outline_children(state, child, guides, prefix, out);
        prefix.truncate(len);
    }
}

fn markers(state: &EditorState, node: &CauseNode) -> String {
    let id = node.id();
    let mut out = String::new();
    if state.selection.is_selected(id) {
        out.push_str(" *");
    }
    if state.selection.focus.as_ref() == Some(id) {
        out.push_str(" @");
    }
    let priority = state.priority(id);
    if priority != PriorityLevel::None {
        let _ = write!(out, " !{priority}");
    }
    if !state.note(id).is_empty() {
        out.push_str(" [note]");
    }
    let personas = state.diagram.personas_of(node);
    if !personas.is_empty() {
        let names: Vec<&str> = personas.iter().map(|p| p.name.as_str()).collect();
        let _ = write!(out, " {{{}}}", names.join(", "));
    }
    out
}

fn rect(r: &Rect) -> String {
    format!("({:.1}, {:.1}) {:.0}x{:.0}", r.x, r.y, r.width, r.height)
}

/// Category and cause boxes of the fishbone view.
#[must_use]
pub fn fishbone_report(layout: &FishboneLayout) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "fishbone {:.0}x{:.0}, spine x={:.0} y={:.0}..{:.0}",
        layout.width, layout.height, layout.spine.x, layout.spine.top, layout.spine.bottom
    );
    for cat in &layout.categories {
        let _ = write!(out, "  {} {}", cat.lines.join(" / "), rect(&cat.rect));
        if cat.shift > 0.0 {
            let _ = write!(out, " shift {:.1}", cat.shift);
        }
        out.push('\n');
        for cause in &cat.causes {
            let _ = writeln!(out, "    - {} {}", cause.lines.join(" / "), rect(&cause.rect));
        }
    }
    out
}

/// Cards of the why-tree view, level by level.
#[must_use]
pub fn why_tree_report(layout: &WhyTreeLayout) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "why-tree {:.0}x{:.0}", layout.width, layout.height);
    for band in &layout.levels {
        let _ = writeln!(
            out,
            "  level {} y={:.0}..{:.0}",
            band.depth, band.top, band.bottom
        );
        for card in layout.level(band.depth) {
            let _ = writeln!(out, "    {} {}", card.lines.join(" / "), rect(&card.rect));
        }
    }
    out
}

/// Intervention bundles in display order with their resolved causes.
#[must_use]
pub fn bundles_report(state: &EditorState) -> String {
    let mut out = String::new();
    let root = &state.diagram.root;
    let active = state.toc.active_bundle_id.as_ref();
    for bundle in state.toc.ordered() {
        let marker = if active == Some(&bundle.id) { " (active)" } else { "" };
        let _ = writeln!(out, "bundle {}{marker}", bundle.name);
        for cause in bundle.resolve_causes(root) {
            let role = match tree::depth_of(root, cause.id()) {
                Some(1) => "category",
                Some(2) => "cause",
                _ => "sub-cause",
            };
            let _ = writeln!(out, "  <- {} ({role})", cause.label());
        }
        let dangling = bundle.dangling_causes(root).len();
        if dangling > 0 {
            let _ = writeln!(out, "  ({dangling} deleted cause(s) ignored)");
        }
    }
    out
}
