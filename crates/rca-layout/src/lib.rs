#![forbid(unsafe_code)]

//! Geometry engines for the two diagram views.
//!
//! Both engines are pure functions of a tree snapshot and a config: they do
//! no caching and can be recomputed on every state change.
//!
//! - [`fishbone`] - spine, category and cause boxes with cascading offsets
//! - [`why_tree`] - balanced, subtree-width-aware layout of any subtree
//! - [`connector`] - Bezier curves between boxes
//! - [`viewport`] - pan/zoom state per canvas
//!
//! # Example
//! ```
//! use rca_core::Diagram;
//! use rca_layout::{FishboneConfig, WhyTreeConfig, compute_fishbone, compute_why_tree};
//!
//! let diagram = Diagram::starter();
//! let fishbone = compute_fishbone(&diagram.root, &FishboneConfig::default());
//! assert_eq!(fishbone.categories.len(), 3);
//!
//! let why = compute_why_tree(&diagram.root.children()[0], &WhyTreeConfig::default());
//! assert_eq!(why.levels.len(), 2);
//! ```

pub mod connector;
pub mod fishbone;
pub mod viewport;
pub mod why_tree;

pub use connector::Curve;
pub use fishbone::{CategoryPlacement, CausePlacement, FishboneConfig, FishboneLayout, compute_fishbone};
pub use viewport::{Viewport, ViewportLimits, ZoomDirection};
pub use why_tree::{WhyEdge, WhyNodeBox, WhyTreeConfig, WhyTreeLayout, compute_why_tree};
