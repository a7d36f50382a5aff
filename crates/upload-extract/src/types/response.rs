//! Response types for the upload endpoint

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::upload::ExtractionResult;
use crate::error::Result;

/// Successful upload response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Human-readable status
    pub message: String,
    /// Extracted text per file, in upload order
    pub file_contents: Vec<String>,
    /// Non-file form fields sent alongside the files
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl UploadResponse {
    /// Build the response from ordered extraction results.
    ///
    /// Fail-fast: the first failed result becomes the error and any text
    /// already extracted from earlier files is discarded.
    pub fn assemble(results: Vec<ExtractionResult>) -> Result<Self> {
        let mut file_contents = Vec::with_capacity(results.len());
        for result in results {
            file_contents.push(result.outcome?);
        }

        Ok(Self {
            message: "Files uploaded and parsed successfully".to_string(),
            file_contents,
            fields: BTreeMap::new(),
        })
    }

    /// Attach the echoed form fields
    pub fn with_fields(mut self, fields: BTreeMap<String, Vec<String>>) -> Self {
        self.fields = fields;
        self
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
}
