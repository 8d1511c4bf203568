#![forbid(unsafe_code)]

//! Where documents live between sessions.
//!
//! - [`MemoryStore`]: in-memory JSON text (tests, ephemeral sessions)
//! - [`FileStore`]: a JSON file written with the write-rename pattern
//!   (requires the `file-storage` feature)
//!
//! Stores hold the serialized JSON rather than a parsed [`Document`], so a
//! load always goes through the same validation as an interactive import.

use std::sync::RwLock;

use crate::document::{Document, DocumentError, DocumentResult};

/// A place a single document can be saved to and loaded from.
pub trait DocumentStore: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Load the stored document. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> DocumentResult<Option<Document>>;

    /// Replace the stored document.
    fn save(&self, doc: &Document) -> DocumentResult<()>;

    /// Remove the stored document.
    fn clear(&self) -> DocumentResult<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw JSON text, which is validated on load.
    #[must_use]
    pub fn with_json(text: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(text.into())),
        }
    }

    fn poisoned() -> DocumentError {
        DocumentError::Invalid("memory store lock poisoned".into())
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn load(&self) -> DocumentResult<Option<Document>> {
        let guard = self.slot.read().map_err(|_| Self::poisoned())?;
        guard.as_deref().map(Document::from_json).transpose()
    }

    fn save(&self, doc: &Document) -> DocumentResult<()> {
        let text = doc.to_json_pretty()?;
        *self.slot.write().map_err(|_| Self::poisoned())? = Some(text);
        Ok(())
    }

    fn clear(&self) -> DocumentResult<()> {
        *self.slot.write().map_err(|_| Self::poisoned())? = None;
        Ok(())
    }
}

#[cfg(feature = "file-storage")]
pub use file::FileStore;

#[cfg(feature = "file-storage")]
mod file {
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    use tracing::debug;

    use super::DocumentStore;
    use crate::document::{Document, DocumentResult};

    /// JSON file store.
    ///
    /// Writes use a temporary file + rename so a crash mid-save never leaves
    /// a truncated document:
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// Store at `path`. The file is created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut name = self.path.file_name().unwrap_or_default().to_os_string();
            name.push(".tmp");
            self.path.with_file_name(name)
        }
    }

    impl DocumentStore for FileStore {
        fn name(&self) -> &str {
            "FileStore"
        }

        fn load(&self) -> DocumentResult<Option<Document>> {
            if !self.path.exists() {
                return Ok(None);
            }
            let text = fs::read_to_string(&self.path)?;
            let doc = Document::from_json(&text)?;
            debug!(path = %self.path.display(), "loaded document");
            Ok(Some(doc))
        }

        fn save(&self, doc: &Document) -> DocumentResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let text = doc.to_json_pretty()?;
            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            debug!(
                path = %self.path.display(),
                bytes = text.len(),
                "saved document"
            );
            Ok(())
        }

        fn clear(&self) -> DocumentResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }
    }
}
