//! Extraction pipeline orchestration

use crate::types::{ExtractionResult, FilePart};

use super::dispatcher::FormatDispatcher;

/// Runs staged parts through the format dispatcher
#[derive(Clone, Default)]
pub struct IngestPipeline {
    dispatcher: FormatDispatcher,
}

impl IngestPipeline {
    /// Create a pipeline over the given dispatcher
    pub fn new(dispatcher: FormatDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Pipeline with every built-in format registered
    pub fn with_defaults() -> Self {
        Self::new(FormatDispatcher::with_defaults())
    }

    pub fn dispatcher(&self) -> &FormatDispatcher {
        &self.dispatcher
    }

    /// Extract text from each part in upload order.
    ///
    /// Stops at the first failure: the returned list ends with that failure
    /// and later parts are never dispatched.
    pub async fn extract_all(&self, parts: &[FilePart]) -> Vec<ExtractionResult> {
        let mut results = Vec::with_capacity(parts.len());

        for part in parts {
            let outcome = match part.validated_mime_type() {
                Ok(mime_type) => self.dispatcher.dispatch(&part.path, mime_type).await,
                Err(e) => Err(e),
            }
            .map_err(|e| e.for_file(&part.original_filename));

            match &outcome {
                Ok(text) => tracing::info!(
                    file = %part.original_filename,
                    chars = text.len(),
                    "Extracted text"
                ),
                Err(e) => tracing::warn!(file = %part.original_filename, "Extraction stopped: {}", e),
            }

            let failed = outcome.is_err();
            results.push(ExtractionResult::for_part(part, outcome));
            if failed {
                break;
            }
        }

        results
    }
}
