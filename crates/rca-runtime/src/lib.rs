#![forbid(unsafe_code)]

//! Editor runtime: state, commands, selection, and persistence.
//!
//! - [`editor`] - [`EditorState`], [`Command`], the pure [`reduce`] step, and
//!   the [`Editor`] wrapper that derives layouts
//! - [`selection`] - selected node and why-tree focus
//! - [`document`] - the JSON document format and its validation
//! - [`storage`] - save/load backends
//!
//! # Example
//! ```
//! use rca_runtime::{ClickOrigin, Command, Editor};
//!
//! let mut editor = Editor::default();
//! let supply = editor.state().diagram.categories()[1].id().clone();
//! editor.update(Command::Select { id: supply.clone(), origin: ClickOrigin::Fishbone });
//! editor.update(Command::AddWhy { parent: supply });
//!
//! let why = editor.why_tree_layout().expect("category is focused");
//! assert_eq!(why.levels.len(), 2);
//! ```

pub mod document;
pub mod editor;
pub mod selection;
pub mod storage;

pub use document::{Document, DocumentError, DocumentResult};
pub use editor::{Command, Editor, EditorState, reduce};
pub use selection::{ClickOrigin, Selection};
#[cfg(feature = "file-storage")]
pub use storage::FileStore;
pub use storage::{DocumentStore, MemoryStore};
