//! Upload ingestion: body collection, multipart decoding, staging and text extraction

mod collector;
mod dispatcher;
mod multipart;
pub mod parser;
mod processor;
mod staging;

pub use collector::{BoxError, ByteSource, ChunkStream, StreamCollector, StreamSource};
pub use dispatcher::FormatDispatcher;
pub use multipart::{boundary_from_headers, MultipartDecoder};
pub use parser::Extractor;
pub use processor::IngestPipeline;
pub use staging::{StagedFiles, StagingArea};
