//! Staging area for uploaded file parts

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::FilePart;

/// Longest client extension carried over to a staged name
const MAX_EXTENSION_LEN: usize = 16;

/// Process-wide scratch directory for uploads
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at `root` (created lazily by [`ensure`](Self::ensure))
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the staging directory and its parents if missing
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::staging(format!("cannot create {}: {}", self.root.display(), e))
        })
    }

    /// Reserve a unique staged name and path for a part.
    ///
    /// The name is a fresh UUID; only a sanitized extension survives from the
    /// client filename, falling back to the declared MIME type.
    pub fn allocate(&self, original_filename: &str, mime_type: Option<&str>) -> (String, PathBuf) {
        let id = Uuid::new_v4().simple().to_string();
        let staged_name = match preserved_extension(original_filename, mime_type) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id,
        };
        let path = self.root.join(&staged_name);
        (staged_name, path)
    }

    /// Open a freshly allocated path for writing
    pub async fn create(&self, path: &Path) -> Result<tokio::fs::File> {
        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| Error::staging(format!("cannot create {}: {}", path.display(), e)))
    }

    /// Remove staged files, returning how many were deleted
    pub async fn dispose(&self, parts: &[FilePart]) -> usize {
        let mut removed = 0;

        for part in parts {
            if !part.path.starts_with(&self.root) {
                tracing::warn!(path = %part.path.display(), "Refusing to remove file outside staging area");
                continue;
            }

            match tokio::fs::remove_file(&part.path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %part.path.display(), "Staged file already gone");
                }
                Err(e) => {
                    tracing::warn!(path = %part.path.display(), "Failed to remove staged file: {}", e);
                }
            }
        }

        removed
    }
}

/// Staged parts owned by one request.
///
/// Parts still held when the guard is dropped are removed in the background,
/// so a cancelled request never leaves files behind.
#[derive(Debug)]
pub struct StagedFiles {
    staging: StagingArea,
    parts: Vec<FilePart>,
}

impl StagedFiles {
    pub fn new(staging: StagingArea) -> Self {
        Self {
            staging,
            parts: Vec::new(),
        }
    }

    pub fn parts(&self) -> &[FilePart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Take ownership of a staged part
    pub fn push(&mut self, part: FilePart) {
        self.parts.push(part);
    }

    pub fn last_mut(&mut self) -> Option<&mut FilePart> {
        self.parts.last_mut()
    }

    /// Remove the most recent part from disk and from the guard
    pub async fn discard_last(&mut self) {
        if let Some(part) = self.parts.pop() {
            self.staging.dispose(std::slice::from_ref(&part)).await;
        }
    }

    /// Remove every held file now
    pub async fn dispose(mut self) -> usize {
        let parts = std::mem::take(&mut self.parts);
        self.staging.dispose(&parts).await
    }

    /// Release the parts without removing their files
    pub fn keep(mut self) -> Vec<FilePart> {
        std::mem::take(&mut self.parts)
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        if self.parts.is_empty() {
            return;
        }

        let parts = std::mem::take(&mut self.parts);
        tracing::debug!(files = parts.len(), "Removing staged files of an abandoned request");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let staging = self.staging.clone();
                handle.spawn(async move {
                    staging.dispose(&parts).await;
                });
            }
            Err(_) => {
                for part in parts.iter().filter(|p| p.path.starts_with(&self.staging.root)) {
                    if let Err(e) = std::fs::remove_file(&part.path) {
                        if e.kind() != ErrorKind::NotFound {
                            tracing::warn!(path = %part.path.display(), "Failed to remove staged file: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Extension to keep on a staged file, if any
fn preserved_extension(original_filename: &str, mime_type: Option<&str>) -> Option<String> {
    let from_name = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase());

    from_name.or_else(|| {
        mime_type
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    })
}
