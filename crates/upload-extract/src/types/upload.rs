//! Decoded upload types

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// One file entry decoded from a multipart body and written to the staging area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Filename as sent by the client (never used as a path)
    pub original_filename: String,
    /// Declared MIME type of the part, if the client sent one
    pub mime_type: Option<String>,
    /// Name assigned in the staging area
    pub staged_name: String,
    /// Full path of the staged file
    pub path: PathBuf,
    /// Bytes written to the staged file
    pub size: u64,
}

impl FilePart {
    /// Declared MIME type, rejecting parts that lack a name or type
    pub fn validated_mime_type(&self) -> Result<&str> {
        if self.staged_name.is_empty() {
            return Err(Error::invalid_upload(format!(
                "part '{}' was not staged",
                self.original_filename
            )));
        }
        match self.mime_type.as_deref() {
            Some(mime) if !mime.is_empty() => Ok(mime),
            _ => Err(Error::invalid_upload(format!(
                "part '{}' has no content type",
                self.original_filename
            ))),
        }
    }
}

/// Output of the multipart decoder
#[derive(Debug, Default)]
pub struct DecodedUpload {
    /// File parts in upload order
    pub files: Vec<FilePart>,
    /// Non-file text fields; repeated names keep every value in order
    pub fields: BTreeMap<String, Vec<String>>,
}

/// Outcome of dispatching one file part
#[derive(Debug)]
pub struct ExtractionResult {
    /// Client filename of the originating part
    pub filename: String,
    /// Declared MIME type of the originating part
    pub mime_type: Option<String>,
    /// Extracted text or the normalized failure
    pub outcome: Result<String>,
}

impl ExtractionResult {
    /// Tag an outcome with the part it came from
    pub fn for_part(part: &FilePart, outcome: Result<String>) -> Self {
        Self {
            filename: part.original_filename.clone(),
            mime_type: part.mime_type.clone(),
            outcome,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
