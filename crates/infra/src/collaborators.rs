//! Contracts with excluded collaborators.
//!
//! The real file store lives outside the ledger core; we only depend on this
//! narrow contract. Failures propagate as errors to the caller and must occur
//! *before* the owning record is created, so a failed upload never leaves a
//! half-created bill behind.

use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("file rejected: {0}")]
    Rejected(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// `upload_file(buffer, filename, mimetype) -> url`.
pub trait FileStorage: Send + Sync {
    fn upload_file(
        &self,
        buffer: &[u8],
        filename: &str,
        mimetype: &str,
    ) -> Result<String, FileStorageError>;
}

/// One uploaded file, as captured by the in-memory implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub mimetype: String,
    pub size: usize,
    pub url: String,
}

/// In-memory file storage for tests/dev. Optionally wired to fail, to
/// exercise the "upload fails → no bill created" path.
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    files: Mutex<Vec<StoredFile>>,
    fail: Mutex<bool>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        if let Ok(mut guard) = self.fail.lock() {
            *guard = fail;
        }
    }

    pub fn stored(&self) -> Vec<StoredFile> {
        match self.files.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FileStorage for InMemoryFileStorage {
    fn upload_file(
        &self,
        buffer: &[u8],
        filename: &str,
        mimetype: &str,
    ) -> Result<String, FileStorageError> {
        if self.fail.lock().map(|g| *g).unwrap_or(false) {
            return Err(FileStorageError::Unavailable("injected failure".to_string()));
        }
        if buffer.is_empty() {
            return Err(FileStorageError::Rejected("empty file".to_string()));
        }

        let mut files = self
            .files
            .lock()
            .map_err(|_| FileStorageError::Unavailable("lock poisoned".to_string()))?;
        let url = format!("memory://files/{}/{}", files.len(), filename);
        files.push(StoredFile {
            filename: filename.to_string(),
            mimetype: mimetype.to_string(),
            size: buffer.len(),
            url: url.clone(),
        });
        Ok(url)
    }
}
