#![forbid(unsafe_code)]

//! The exchanged JSON document.
//!
//! ```json
//! {
//!   "formatVersion": 1,
//!   "diagram": { "id": "diag-1", "title": "...", "root": { ... } },
//!   "notesByNode": { "<nodeId>": "text" },
//!   "priorityByNode": { "<nodeId>": "high" },
//!   "tocBundles": { "<bundleId>": { ... } },
//!   "activeBundleId": null,
//!   "tocOrder": ["<bundleId>"]
//! }
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `DocumentError::Json` | Malformed JSON or wrong field types | Import rejected |
//! | `DocumentError::MissingRoot` | No `diagram.root` | Import rejected |
//! | `DocumentError::Invalid` | Duplicate node ids, unknown format version | Import rejected |
//! | `DocumentError::Io` | File read/write failure | Returned to caller |
//!
//! A rejected import never touches the caller's state: parsing produces a
//! fresh [`Document`] and callers swap it in only on success.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rca_core::diagram::{Diagram, PriorityLevel};
use rca_core::ids::NodeId;
use rca_core::toc::TocBoard;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from document import, export, and storage.
#[derive(Debug)]
pub enum DocumentError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// JSON encode/decode failure.
    Json(serde_json::Error),
    /// The document has no `diagram.root`.
    MissingRoot,
    /// Structurally valid JSON that violates a document invariant.
    Invalid(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Io(e) => write!(f, "I/O error: {e}"),
            DocumentError::Json(e) => write!(f, "invalid JSON: {e}"),
            DocumentError::MissingRoot => write!(f, "invalid document: missing diagram.root"),
            DocumentError::Invalid(msg) => write!(f, "invalid document: {msg}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(e) => Some(e),
            DocumentError::Json(e) => Some(e),
            DocumentError::MissingRoot | DocumentError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Io(e)
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e)
    }
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the editor persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Absent in documents written before versioning; written as
    /// [`Document::FORMAT_VERSION`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
    pub diagram: Diagram,
    #[serde(default)]
    pub notes_by_node: BTreeMap<NodeId, String>,
    #[serde(default)]
    pub priority_by_node: BTreeMap<NodeId, PriorityLevel>,
    #[serde(flatten)]
    pub toc: TocBoard,
}

impl Document {
    /// Current format version.
    pub const FORMAT_VERSION: u32 = 1;

    /// A document holding `diagram` and nothing else.
    #[must_use]
    pub fn new(diagram: Diagram) -> Self {
        Self {
            format_version: Some(Self::FORMAT_VERSION),
            diagram,
            notes_by_node: BTreeMap::new(),
            priority_by_node: BTreeMap::new(),
            toc: TocBoard::default(),
        }
    }

    /// Parse and validate a document.
    pub fn from_json(text: &str) -> DocumentResult<Document> {
        let value: serde_json::Value = serde_json::from_str(text).inspect_err(|e| {
            warn!(error = %e, "import rejected: malformed JSON");
        })?;
        Self::from_value(value)
    }

    /// Validate and convert an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> DocumentResult<Document> {
        if value.pointer("/diagram/root").is_none_or(serde_json::Value::is_null) {
            warn!("import rejected: missing diagram.root");
            return Err(DocumentError::MissingRoot);
        }
        let doc: Document = serde_json::from_value(value).inspect_err(|e| {
            warn!(error = %e, "import rejected: document shape");
        })?;
        doc.validate()?;
        debug!(
            nodes = doc.diagram.root.subtree_len(),
            notes = doc.notes_by_node.len(),
            bundles = doc.toc.toc_bundles.len(),
            "document imported"
        );
        Ok(doc)
    }

    /// Serialize as pretty-printed JSON, stamping the current format version.
    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        let stamped = Document {
            format_version: Some(Self::FORMAT_VERSION),
            ..self.clone()
        };
        Ok(serde_json::to_string_pretty(&stamped)?)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> DocumentResult<()> {
        if let Some(version) = self.format_version
            && version > Self::FORMAT_VERSION
        {
            warn!(version, "import rejected: unsupported format version");
            return Err(DocumentError::Invalid(format!(
                "unsupported format version {version} (newest known is {})",
                Self::FORMAT_VERSION
            )));
        }

        let mut seen = HashSet::new();
        for node in self.diagram.root.iter() {
            if !seen.insert(node.id()) {
                warn!(node_id = %node.id(), "import rejected: duplicate node id");
                return Err(DocumentError::Invalid(format!(
                    "duplicate node id `{}`",
                    node.id()
                )));
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Diagram::starter())
    }
}
