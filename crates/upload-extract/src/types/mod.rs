//! Core types for the upload pipeline

pub mod response;
pub mod upload;

pub use response::{ErrorResponse, UploadResponse};
pub use upload::{DecodedUpload, ExtractionResult, FilePart};
