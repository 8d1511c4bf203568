#![forbid(unsafe_code)]

//! Pan and zoom state for a diagram canvas.
//!
//! Screen coordinates map to canvas coordinates through
//! `screen = canvas * scale + pan`. Zooming at a cursor adjusts `pan` so the
//! canvas point under the cursor stays put.

use rca_core::geometry::Point;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Wheel deltas smaller than this are treated as trackpad input.
pub const FINE_DELTA_THRESHOLD: f64 = 15.0;

/// Zoom bounds and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    pub step: f64,
    /// Multiplier applied to `step` for fine (trackpad) zooming.
    pub fine_factor: f64,
}

impl ViewportLimits {
    /// Limits for the why-tree canvas.
    pub const WHY_TREE: Self = Self {
        min_scale: 0.3,
        max_scale: 2.5,
        step: 0.1,
        fine_factor: 0.2,
    };

    /// Limits for the fishbone canvas.
    pub const FISHBONE: Self = Self {
        min_scale: 0.5,
        max_scale: 2.0,
        step: 0.1,
        fine_factor: 0.2,
    };

    fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self::WHY_TREE
    }
}

/// Zoom direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    fn sign(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Out => -1.0,
        }
    }
}

/// Pan/zoom state of one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pan: Point,
    scale: f64,
    limits: ViewportLimits,
    #[serde(skip)]
    drag: Option<DragAnchor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    cursor: Point,
    pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportLimits::default())
    }
}

impl Viewport {
    #[must_use]
    pub fn new(limits: ViewportLimits) -> Self {
        Self {
            pan: Point::default(),
            scale: 1.0,
            limits,
            drag: None,
        }
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn limits(&self) -> ViewportLimits {
        self.limits
    }

    /// Step the scale up, clamped to the maximum.
    pub fn zoom_in(&mut self) {
        self.scale = self.limits.clamp(self.scale + self.limits.step);
    }

    /// Step the scale down, clamped to the minimum.
    pub fn zoom_out(&mut self) {
        self.scale = self.limits.clamp(self.scale - self.limits.step);
    }

    /// Set the scale directly, clamped to the limits.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = self.limits.clamp(scale);
    }

    /// Back to scale 1 with no pan.
    pub fn reset(&mut self) {
        self.pan = Point::default();
        self.scale = 1.0;
        self.drag = None;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.offset(dx, dy);
    }

    /// Zoom one step while keeping the canvas point under `cursor` fixed.
    ///
    /// Returns `false` when the scale is already at the limit.
    pub fn zoom_at(&mut self, cursor: Point, direction: ZoomDirection, fine: bool) -> bool {
        let step = if fine {
            self.limits.step * self.limits.fine_factor
        } else {
            self.limits.step
        };
        let old = self.scale;
        let new = self.limits.clamp(old + direction.sign() * step);
        if new == old {
            return false;
        }
        let factor = new / old;
        self.pan = Point::new(
            cursor.x - (cursor.x - self.pan.x) * factor,
            cursor.y - (cursor.y - self.pan.y) * factor,
        );
        self.scale = new;
        trace!(scale = new, "viewport zoomed");
        true
    }

    /// Handle a wheel event: negative `delta_y` zooms in, small deltas zoom finely.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) -> bool {
        let direction = if delta_y > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        };
        self.zoom_at(cursor, direction, delta_y.abs() < FINE_DELTA_THRESHOLD)
    }

    /// Start a pan drag at `cursor`.
    pub fn begin_drag(&mut self, cursor: Point) {
        self.drag = Some(DragAnchor {
            cursor,
            pan: self.pan,
        });
    }

    /// Move an active drag; ignored when no drag is active.
    pub fn drag_to(&mut self, cursor: Point) {
        if let Some(anchor) = self.drag {
            self.pan = anchor
                .pan
                .offset(cursor.x - anchor.cursor.x, cursor.y - anchor.cursor.y);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Canvas point shown at `screen`.
    #[must_use]
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y) / self.scale,
        )
    }

    /// Screen position of canvas point `canvas`.
    #[must_use]
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.pan.x,
            canvas.y * self.scale + self.pan.y,
        )
    }
}
