//! Error types for the upload pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::types::response::ErrorResponse;

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, Error>;

/// Upload and extraction errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried no payload
    #[error("Request body is empty")]
    MissingBody,

    /// The staging directory could not be prepared or written
    #[error("Staging area unavailable: {0}")]
    StagingUnavailable(String),

    /// Malformed multipart body or a file part missing its name or MIME type
    #[error("Invalid file upload: {0}")]
    InvalidUpload(String),

    /// No file part was sent under the upload field
    #[error("No file uploaded")]
    NoFileUploaded,

    /// Staged file disappeared before extraction
    #[error("Staged file not found: {0}")]
    FileNotFound(String),

    /// MIME type has no registered extraction strategy
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The decoder rejected the document content
    #[error("Failed to extract text from '{filename}': {message}")]
    ExtractionFailed { filename: String, message: String },

    /// Request body exceeds the configured limit
    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a staging error
    pub fn staging(message: impl Into<String>) -> Self {
        Self::StagingUnavailable(message.into())
    }

    /// Create an invalid upload error
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Attribute an extraction failure to the client's filename
    pub fn for_file(self, filename: &str) -> Self {
        match self {
            Error::ExtractionFailed { message, .. } => Error::extraction(filename, message),
            other => other,
        }
    }

    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::MissingBody => (StatusCode::BAD_REQUEST, "missing_body"),
            Error::StagingUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "staging_unavailable")
            }
            Error::InvalidUpload(_) => (StatusCode::BAD_REQUEST, "invalid_upload"),
            Error::NoFileUploaded => (StatusCode::BAD_REQUEST, "no_file"),
            Error::FileNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "file_not_found"),
            Error::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_format"),
            Error::ExtractionFailed { .. } => (StatusCode::BAD_REQUEST, "extraction_failed"),
            Error::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, "Upload failed: {}", self);
        } else {
            tracing::warn!(code, "Upload rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
