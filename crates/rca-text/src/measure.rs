#![forbid(unsafe_code)]

//! Box sizing from wrapped label text.
//!
//! A box's height is `max(min_height, lines * line_height + padding)`; its
//! width is fixed per box kind. The presets reproduce the editor's look for
//! fishbone categories, fishbone causes, and why-tree cards, but every field
//! is public so callers can tune them.

use rca_core::geometry::Size;

use crate::wrap::wrap_text;

/// Height of a box holding `text` wrapped at `max_chars_per_line`.
#[must_use]
pub fn box_height(
    text: &str,
    max_chars_per_line: usize,
    line_height: f64,
    min_height: f64,
    padding: f64,
) -> f64 {
    let lines = wrap_text(text, max_chars_per_line).len() as f64;
    min_height.max(lines * line_height + padding)
}

/// Sizing parameters for one kind of box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    /// Wrap limit in characters.
    pub max_chars_per_line: usize,
    /// Vertical advance per wrapped line.
    pub line_height: f64,
    /// Floor applied to the computed height.
    pub min_height: f64,
    /// Vertical padding added to the text block.
    pub padding: f64,
    /// Fixed box width.
    pub width: f64,
}

impl BoxMetrics {
    /// Category boxes on the fishbone.
    pub const CATEGORY: Self = Self {
        max_chars_per_line: 18,
        line_height: 17.0,
        min_height: 36.0,
        padding: 4.0,
        width: 150.0,
    };

    /// Cause boxes stacked to the right of a category.
    pub const CAUSE: Self = Self {
        max_chars_per_line: 20,
        line_height: 16.0,
        min_height: 28.0,
        padding: 2.0,
        width: 170.0,
    };

    /// Cards in the why-tree view.
    pub const WHY_CARD: Self = Self {
        max_chars_per_line: 22,
        line_height: 15.0,
        min_height: 40.0,
        padding: 12.0,
        width: 160.0,
    };

    /// Height of a box for `text`.
    #[must_use]
    pub fn height_for(&self, text: &str) -> f64 {
        box_height(
            text,
            self.max_chars_per_line,
            self.line_height,
            self.min_height,
            self.padding,
        )
    }

    /// Size of a box for `text`.
    #[must_use]
    pub fn size_for(&self, text: &str) -> Size {
        Size::new(self.width, self.height_for(text))
    }

    /// Wrap `text` and size the resulting box in one pass.
    #[must_use]
    pub fn measure(&self, text: &str) -> TextBox {
        let lines = wrap_text(text, self.max_chars_per_line);
        let height = self
            .min_height
            .max(lines.len() as f64 * self.line_height + self.padding);
        TextBox {
            lines,
            size: Size::new(self.width, height),
        }
    }
}

/// Wrapped lines together with the box that holds them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub lines: Vec<String>,
    pub size: Size,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_uses_min_height() {
        assert_eq!(BoxMetrics::CATEGORY.height_for("Supply"), 36.0);
        assert_eq!(BoxMetrics::CAUSE.height_for("Stockouts"), 28.0);
    }

    #[test]
    fn empty_label_counts_one_line() {
        // 1 * 17 + 4 = 21 < 36
        assert_eq!(BoxMetrics::CATEGORY.height_for(""), 36.0);
        assert_eq!(box_height("", 10, 30.0, 0.0, 5.0), 35.0);
    }

    #[test]
    fn long_label_grows() {
        // "Limited community health worker availability" at 20 chars:
        // ["Limited community", "health worker", "availability"] = 3 lines.
        let h = BoxMetrics::CAUSE.height_for("Limited community health worker availability");
        assert_eq!(h, 3.0 * 16.0 + 2.0);
    }

    #[test]
    fn measure_matches_height_for() {
        let text = "Vaccine carriers not returned to the district store on time";
        for metrics in [BoxMetrics::CATEGORY, BoxMetrics::CAUSE, BoxMetrics::WHY_CARD] {
            let measured = metrics.measure(text);
            assert_eq!(measured.size.height, metrics.height_for(text));
            assert_eq!(measured.size.width, metrics.width);
            assert!(!measured.lines.is_empty());
        }
    }

    #[test]
    fn box_height_is_monotonic_in_text_length() {
        let metrics = BoxMetrics::WHY_CARD;
        let mut label = String::new();
        let mut last = metrics.height_for(&label);
        for _ in 0..30 {
            label.push_str("word ");
            let h = metrics.height_for(&label);
            assert!(h >= last);
            last = h;
        }
    }
}
