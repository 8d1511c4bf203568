#![forbid(unsafe_code)]

//! Fishbone geometry.
//!
//! A vertical spine sits at a fixed x. Each category of the root hangs to the
//! right of the spine, and its causes stack downward in a column further
//! right, starting level with the category.
//!
//! Categories start at evenly spaced base positions. A single forward pass
//! pushes a category down whenever the previous category's footprint (its
//! box plus its stacked causes) would come within `min_gap_after_previous`
//! of it, and carries that shift forward to every later base position.
//!
//! # Invariants
//!
//! For any label lengths:
//! - cause boxes within one category never overlap;
//! - no box of category *i* (the category or any of its causes) overlaps the
//!   box of category *i + 1* or any of its causes;
//! - the canvas contains every box plus the bottom margin.

use rca_core::geometry::{Point, Rect};
use rca_core::ids::NodeId;
use rca_core::node::NodeRef;
use rca_text::BoxMetrics;
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::connector::Curve;

/// Fishbone layout parameters (logical canvas units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishboneConfig {
    pub spine_x: f64,
    pub spine_start_y: f64,
    /// Distance between uncascaded category base positions.
    pub initial_spacing: f64,
    /// Horizontal distance from the spine to category box centres.
    pub category_offset_x: f64,
    /// Horizontal distance from category centres to cause box centres.
    pub cause_offset_x: f64,
    /// Vertical gap between stacked cause boxes.
    pub cause_spacing_y: f64,
    /// Minimum vertical gap between one category's footprint and the next.
    pub min_gap_after_previous: f64,
    /// Space kept below the lowest box.
    pub bottom_margin: f64,
    /// Space kept right of the rightmost box.
    pub right_margin: f64,
    /// Minimum spine length below `spine_start_y`.
    pub min_spine_length: f64,
    /// Distance from the canvas bottom up to the end of the spine.
    pub spine_tail: f64,
    pub min_width: f64,
    pub min_height: f64,
    /// Horizontal handle length of category-to-cause connectors.
    pub connector_handle: f64,
    pub category_box: BoxMetrics,
    pub cause_box: BoxMetrics,
}

impl Default for FishboneConfig {
    fn default() -> Self {
        Self {
            spine_x: 80.0,
            spine_start_y: 50.0,
            initial_spacing: 120.0,
            category_offset_x: 120.0,
            cause_offset_x: 200.0,
            cause_spacing_y: 20.0,
            min_gap_after_previous: 50.0,
            bottom_margin: 40.0,
            right_margin: 15.0,
            min_spine_length: 60.0,
            spine_tail: 60.0,
            min_width: 500.0,
            min_height: 600.0,
            connector_handle: 45.0,
            category_box: BoxMetrics::CATEGORY,
            cause_box: BoxMetrics::CAUSE,
        }
    }
}

impl FishboneConfig {
    /// X of category box centres.
    #[must_use]
    pub fn category_x(&self) -> f64 {
        self.spine_x + self.category_offset_x
    }

    /// X of cause box centres.
    #[must_use]
    pub fn cause_x(&self) -> f64 {
        self.category_x() + self.cause_offset_x
    }
}

/// The vertical spine line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spine {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A positioned cause box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CausePlacement {
    pub id: NodeId,
    pub lines: Vec<String>,
    pub rect: Rect,
    /// Curve from the owning category's right edge to this box.
    pub connector: Curve,
}

/// A positioned category box with its cause column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPlacement {
    pub id: NodeId,
    pub lines: Vec<String>,
    pub rect: Rect,
    /// Curve from the spine to this box.
    pub connector: Curve,
    /// How far the cascade pushed this category below its base position.
    pub shift: f64,
    pub causes: Vec<CausePlacement>,
}

impl CategoryPlacement {
    /// Bounding box of the category and all its causes.
    #[must_use]
    pub fn footprint(&self) -> Rect {
        self.causes
            .iter()
            .fold(self.rect, |acc, cause| acc.union(&cause.rect))
    }

    /// Every box owned by this category, category first.
    pub fn boxes(&self) -> impl Iterator<Item = &Rect> {
        std::iter::once(&self.rect).chain(self.causes.iter().map(|c| &c.rect))
    }
}

/// Complete fishbone layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FishboneLayout {
    pub spine: Spine,
    pub categories: Vec<CategoryPlacement>,
    pub width: f64,
    pub height: f64,
}

impl FishboneLayout {
    /// Box of the category or cause with this id.
    #[must_use]
    pub fn rect_of(&self, id: &NodeId) -> Option<Rect> {
        self.categories.iter().find_map(|cat| {
            if &cat.id == id {
                return Some(cat.rect);
            }
            cat.causes.iter().find(|c| &c.id == id).map(|c| c.rect)
        })
    }

    /// Topmost box under `point`, if any.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<&NodeId> {
        self.categories.iter().find_map(|cat| {
            if cat.rect.contains(point) {
                return Some(&cat.id);
            }
            cat.causes
                .iter()
                .find(|c| c.rect.contains(point))
                .map(|c| &c.id)
        })
    }

    /// Number of placed boxes.
    #[must_use]
    pub fn box_count(&self) -> usize {
        self.categories.iter().map(|c| 1 + c.causes.len()).sum()
    }
}

/// Heights computed for one category before placement.
struct Measured {
    category_height: f64,
    cause_heights: Vec<f64>,
}

impl Measured {
    /// Extent above the category centre: the category box or the first cause,
    /// whichever reaches higher.
    fn upper_extent(&self) -> f64 {
        let first_cause = self.cause_heights.first().copied().unwrap_or(0.0);
        self.category_height.max(first_cause) / 2.0
    }

    /// Sum of cause heights plus the gaps between them.
    fn stack_height(&self, spacing: f64) -> f64 {
        let n = self.cause_heights.len();
        if n == 0 {
            return 0.0;
        }
        self.cause_heights.iter().sum::<f64>() + spacing * (n - 1) as f64
    }
}

/// Lay out the categories (children of `root`) and their causes.
#[must_use]
pub fn compute_fishbone(root: &NodeRef, config: &FishboneConfig) -> FishboneLayout {
    let categories = root.children();
    let _span = debug_span!("rca.layout.fishbone", categories = categories.len()).entered();

    let measured: Vec<Measured> = categories
        .iter()
        .map(|cat| Measured {
            category_height: config.category_box.height_for(cat.label()),
            cause_heights: cat
                .children()
                .iter()
                .map(|cause| config.cause_box.height_for(cause.label()))
                .collect(),
        })
        .collect();

    let centres = cascade_centres(&measured, config);

    let cat_x = config.category_x();
    let cause_x = config.cause_x();
    let mut placements = Vec::with_capacity(categories.len());

    for ((cat, m), &(cat_y, shift)) in categories.iter().zip(&measured).zip(&centres) {
        let cat_box = config.category_box.measure(cat.label());
        let rect = Rect::from_center(Point::new(cat_x, cat_y), cat_box.size);

        let mut top = cat_y - m.cause_heights.first().copied().unwrap_or(0.0) / 2.0;
        let causes = cat
            .children()
            .iter()
            .map(|cause| {
                let cause_box = config.cause_box.measure(cause.label());
                let cause_rect = Rect::new(
                    cause_x - cause_box.size.width / 2.0,
                    top,
                    cause_box.size.width,
                    cause_box.size.height,
                );
                top += cause_box.size.height + config.cause_spacing_y;
                CausePlacement {
                    id: cause.id().clone(),
                    lines: cause_box.lines,
                    connector: Curve::horizontal(
                        rect.right_center(),
                        cause_rect.left_center(),
                        config.connector_handle,
                    ),
                    rect: cause_rect,
                }
            })
            .collect();

        placements.push(CategoryPlacement {
            id: cat.id().clone(),
            lines: cat_box.lines,
            connector: Curve::branch(Point::new(config.spine_x, cat_y), rect.left_center()),
            rect,
            shift,
            causes,
        });
    }

    let lowest = placements
        .iter()
        .flat_map(|c| c.boxes())
        .map(Rect::bottom)
        .fold(f64::NEG_INFINITY, f64::max);
    let rightmost = placements
        .iter()
        .flat_map(|c| c.boxes())
        .map(Rect::right)
        .fold(f64::NEG_INFINITY, f64::max);

    // The spine tail is carved out of the canvas, not added below it.
    let extent = (config.spine_start_y + config.min_spine_length).max(lowest + config.bottom_margin);
    let height = config.min_height.max(extent);
    let width = config.min_width.max(rightmost + config.right_margin);

    debug!(
        categories = placements.len(),
        width, height, "fishbone layout computed"
    );

    FishboneLayout {
        spine: Spine {
            x: config.spine_x,
            top: config.spine_start_y,
            bottom: height - config.spine_tail,
        },
        categories: placements,
        width,
        height,
    }
}

/// Centre y and cascade shift for every category, in order.
fn cascade_centres(measured: &[Measured], config: &FishboneConfig) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(measured.len());
    let mut offset = 0.0;

    for (i, m) in measured.iter().enumerate() {
        let base = config.spine_start_y + config.initial_spacing * (i + 1) as f64 + offset;

        let floor = match out.last() {
            Some(&(prev_y, _)) => {
                let prev = &measured[i - 1];
                let prev_bottom = prev_footprint_bottom(prev_y, prev, config);
                prev_bottom + config.min_gap_after_previous + m.upper_extent()
            }
            None => config.spine_start_y + m.upper_extent(),
        };

        let y = base.max(floor);
        let shift = y - base;
        if shift > 0.0 {
            debug!(index = i, shift, "category pushed down");
        }
        offset += shift;
        out.push((y, shift));
    }
    out
}

/// Lowest point reached by a placed category, counted conservatively as its
/// box bottom plus the full cause stack.
fn prev_footprint_bottom(centre: f64, m: &Measured, config: &FishboneConfig) -> f64 {
    centre + m.category_height / 2.0 + m.stack_height(config.cause_spacing_y)
}
