#![forbid(unsafe_code)]

//! Bezier connectors between boxes.

use rca_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// A smooth connector between two anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Curve {
    Quadratic {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl Curve {
    /// Quadratic curve whose control point sits at the horizontal midpoint,
    /// level with `to`.
    #[must_use]
    pub fn branch(from: Point, to: Point) -> Self {
        Self::Quadratic {
            from,
            ctrl: Point::new((from.x + to.x) / 2.0, to.y),
            to,
        }
    }

    /// Horizontal S-curve: leaves `from` heading right, enters `to` heading right.
    #[must_use]
    pub fn horizontal(from: Point, to: Point, handle: f64) -> Self {
        Self::Cubic {
            from,
            ctrl1: Point::new(from.x + handle, from.y),
            ctrl2: Point::new(to.x - handle, to.y),
            to,
        }
    }

    /// Vertical S-curve with both handles at the midpoint height.
    #[must_use]
    pub fn vertical(from: Point, to: Point) -> Self {
        let mid = (from.y + to.y) / 2.0;
        Self::Cubic {
            from,
            ctrl1: Point::new(from.x, mid),
            ctrl2: Point::new(to.x, mid),
            to,
        }
    }

    #[must_use]
    pub fn start(&self) -> Point {
        match *self {
            Self::Quadratic { from, .. } | Self::Cubic { from, .. } => from,
        }
    }

    #[must_use]
    pub fn end(&self) -> Point {
        match *self {
            Self::Quadratic { to, .. } | Self::Cubic { to, .. } => to,
        }
    }

    /// Evaluate the curve at `t` in `[0, 1]` (de Casteljau).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Quadratic { from, ctrl, to } => {
                let a = from.lerp(ctrl, t);
                let b = ctrl.lerp(to, t);
                a.lerp(b, t)
            }
            Self::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let a = from.lerp(ctrl1, t);
                let b = ctrl1.lerp(ctrl2, t);
                let c = ctrl2.lerp(to, t);
                a.lerp(b, t).lerp(b.lerp(c, t), t)
            }
        }
    }

    /// SVG path data, e.g. `M 80,170 Q 140,170 200,170`.
    #[must_use]
    pub fn to_svg_path(&self) -> String {
        match *self {
            Self::Quadratic { from, ctrl, to } => format!(
                "M {},{} Q {},{} {},{}",
                from.x, from.y, ctrl.x, ctrl.y, to.x, to.y
            ),
            Self::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => format!(
                "M {},{} C {},{} {},{} {},{}",
                from.x, from.y, ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
        }
    }
}
