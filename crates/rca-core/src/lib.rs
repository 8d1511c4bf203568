#![forbid(unsafe_code)]

//! Core: the cause tree, its identifiers, and structurally shared mutations.
//!
//! - [`node`] - [`CauseNode`] and the node factory
//! - [`tree`] - total, structurally shared mutations and queries
//! - [`diagram`] - [`Diagram`], personas, priorities, cause bank templates
//! - [`toc`] - Theory-of-Change bundles anchored to causes by id
//! - [`geometry`] - `f64` points and boxes shared by the layout engines

pub mod diagram;
pub mod geometry;
pub mod ids;
pub mod node;
pub mod toc;
pub mod tree;

pub use diagram::{CauseTemplate, Diagram, Persona, PriorityLevel};
pub use geometry::{Point, Rect, Size};
pub use ids::{BundleId, NodeId, PersonaId};
pub use node::{CauseNode, NodeRef, create_node};
pub use toc::{TocBoard, TocBundle};
pub use tree::{NodeRole, SiblingScope};
