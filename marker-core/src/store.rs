//! Single-slot storage for the last saved composite.
//!
//! The store keeps exactly one encoded image under a fixed name. Writing
//! overwrites unconditionally; there is no history and no versioning.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Default file name of the saved composite.
pub const SAVED_IMAGE_NAME: &str = "markedAndSaved.jpg";

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the saved image failed for a reason other than absence.
    #[error("Failed to read saved image: {0}")]
    Read(#[source] std::io::Error),
    /// Storage denied or unavailable.
    #[error("Failed to write image: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Key-by-fixed-name byte store.
pub trait ImageStore {
    /// Read the saved bytes. `Ok(None)` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the slot exists but cannot be read.
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Overwrite the slot with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteFailed`] if storage is denied or unavailable.
    fn write(&self, bytes: &[u8]) -> StoreResult<()>;

    /// Name of the slot on disk, when the store is file-backed. Callers pick
    /// the encoding from its extension.
    fn file_name(&self) -> Option<&str> {
        None
    }
}

impl<S: ImageStore + ?Sized> ImageStore for &S {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        (**self).write(bytes)
    }

    fn file_name(&self) -> Option<&str> {
        (**self).file_name()
    }
}

/// Stores the composite as one file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileImageStore {
    path: PathBuf,
}

impl FileImageStore {
    /// Create a store writing [`SAVED_IMAGE_NAME`] inside `data_dir`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteFailed`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_file_name(data_dir, SAVED_IMAGE_NAME)
    }

    /// Create a store writing `file_name` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteFailed`] if the directory cannot be created.
    pub fn with_file_name(data_dir: impl Into<PathBuf>, file_name: &str) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(StoreError::WriteFailed)?;
        Ok(Self {
            path: data_dir.join(sanitize_filename(file_name)),
        })
    }

    /// Full path of the slot.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageStore for FileImageStore {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                tracing::debug!(
                    "Read {} bytes from {}",
                    bytes.len(),
                    self.path.display()
                );
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        std::fs::write(&self.path, bytes).map_err(|e| {
            tracing::warn!("Failed to write {}: {e}", self.path.display());
            StoreError::WriteFailed(e)
        })?;
        tracing::debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(std::ffi::OsStr::to_str)
    }
}

/// In-memory slot, for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    slot: RwLock<Option<Vec<u8>>>,
    reject_writes: bool,
}

impl MemoryImageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `bytes`.
    #[must_use]
    pub fn with_contents(bytes: Vec<u8>) -> Self {
        Self {
            slot: RwLock::new(Some(bytes)),
            reject_writes: false,
        }
    }

    /// Create a store that denies every write.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            slot: RwLock::new(None),
            reject_writes: true,
        }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ImageStore for MemoryImageStore {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        if self.reject_writes {
            return Err(StoreError::WriteFailed(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        *self
            .slot
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(bytes.to_vec());
        Ok(())
    }
}

/// Sanitize a slot name for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, `_` or `.` with `_`,
/// and refuses names made only of dots.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        SAVED_IMAGE_NAME.to_string()
    } else {
        cleaned
    }
}
