//! upload-extract: HTTP document upload with plain-text extraction
//!
//! Clients post `multipart/form-data` to `/api/upload`. Each file part is staged
//! under a unique name, routed by its declared MIME type to a decoder (PDF, DOCX,
//! or the first sheet of an XLSX workbook rendered as CSV), and the extracted
//! texts are returned in upload order. The first failure aborts the request.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod server;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::ExtractConfig;
pub use error::{Error, Result};
pub use ingestion::{Extractor, FormatDispatcher, IngestPipeline};
pub use server::UploadServer;
pub use types::{ErrorResponse, UploadResponse};
