#![forbid(unsafe_code)]

//! Text measurement for diagram boxes.
//!
//! - [`wrap`] - greedy word wrap with long-word chunking
//! - [`measure`] - box heights derived from wrapped line counts
//!
//! # Example
//! ```
//! use rca_text::{BoxMetrics, wrap_text};
//!
//! assert_eq!(wrap_text("Cold chain stockouts", 10), vec!["Cold chain", "stockouts"]);
//!
//! let size = BoxMetrics::CAUSE.size_for("Cold chain stockouts");
//! assert_eq!(size.width, 170.0);
//! assert_eq!(size.height, 28.0);
//! ```

pub mod measure;
pub mod wrap;

pub use measure::{BoxMetrics, TextBox, box_height};
pub use wrap::{char_len, display_width, line_count, truncate_with_ellipsis, wrap_text};
