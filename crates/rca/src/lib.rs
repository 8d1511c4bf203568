#![forbid(unsafe_code)]

//! RCA editor public facade crate.
//!
//! This crate provides the stable surface area for front ends. It re-exports
//! the common types from the internal crates and offers a small prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use rca_core::{
    BundleId, CauseNode, CauseTemplate, Diagram, NodeId, NodeRef, NodeRole, Persona, PersonaId,
    Point, PriorityLevel, Rect, SiblingScope, Size, TocBoard, TocBundle, create_node,
};

// --- Text re-exports -------------------------------------------------------

pub use rca_text::{BoxMetrics, box_height, wrap_text};

// --- Layout re-exports -----------------------------------------------------

pub use rca_layout::{
    Curve, FishboneConfig, FishboneLayout, Viewport, ViewportLimits, WhyTreeConfig,
    WhyTreeLayout, ZoomDirection, compute_fishbone, compute_why_tree,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "file-storage")]
pub use rca_runtime::FileStore;
pub use rca_runtime::{
    ClickOrigin, Command, Document, DocumentError, DocumentStore, Editor, EditorState,
    MemoryStore, Selection, reduce,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for RCA front ends.
#[derive(Debug)]
pub enum Error {
    /// Document import, export, or storage failure.
    Document(DocumentError),
    /// Bad input outside the document format (arguments, scripts).
    Usage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Usage(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Usage(_) => None,
        }
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Document(DocumentError::Io(err))
    }
}

/// Standard result type for RCA APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ClickOrigin, Command, Diagram, Document, DocumentStore, Editor, Error, MemoryStore,
        NodeId, Result, Viewport,
    };

    pub use crate::{core, layout, runtime, text};
}

pub use rca_core as core;
pub use rca_layout as layout;
pub use rca_runtime as runtime;
pub use rca_text as text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_errors_convert() {
        let err: Error = DocumentError::MissingRoot.into();
        assert!(err.to_string().contains("diagram.root"));
        assert!(std::error::Error::source(&err).is_some());

        let io: Error = std::io::Error::other("disk full").into();
        assert!(matches!(io, Error::Document(DocumentError::Io(_))));
        assert!(Error::Usage("bad flag".into()).to_string() == "bad flag");
    }

    #[test]
    fn prelude_drives_an_editor() {
        use crate::prelude::*;

        fn run() -> Result<usize> {
            let mut editor = Editor::default();
            editor.update(Command::AddCategory);
            let json = editor.export_json()?;
            let doc = Document::from_json(&json)?;
            Ok(doc.diagram.categories().len())
        }
        assert_eq!(run().unwrap(), 4);
    }
}
