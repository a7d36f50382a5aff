//! MIME-type based routing of staged files to extraction strategies

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::parser::Extractor;
#[cfg(feature = "docx")]
use super::parser::{DocxExtractor, DOCX_MIME};
#[cfg(feature = "pdf")]
use super::parser::{PdfExtractor, PDF_MIME};
#[cfg(feature = "xlsx")]
use super::parser::{XlsxExtractor, XLSX_MIME};

/// Registry mapping declared MIME types to extraction strategies
#[derive(Clone, Default)]
pub struct FormatDispatcher {
    strategies: HashMap<String, Arc<dyn Extractor>>,
}

impl FormatDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with every built-in strategy registered
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut dispatcher = Self::new();
        #[cfg(feature = "pdf")]
        dispatcher.register(PDF_MIME, Arc::new(PdfExtractor));
        #[cfg(feature = "docx")]
        dispatcher.register(DOCX_MIME, Arc::new(DocxExtractor));
        #[cfg(feature = "xlsx")]
        dispatcher.register(XLSX_MIME, Arc::new(XlsxExtractor));
        dispatcher
    }

    /// Register (or replace) the strategy for a MIME type
    pub fn register(
        &mut self,
        mime_type: impl Into<String>,
        extractor: Arc<dyn Extractor>,
    ) -> &mut Self {
        self.strategies.insert(mime_type.into(), extractor);
        self
    }

    pub fn supports(&self, mime_type: &str) -> bool {
        self.strategies.contains_key(mime_type)
    }

    /// Registered MIME types, sorted
    pub fn supported_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Extract text from a staged file according to its declared MIME type.
    ///
    /// The file must exist; the type must match a registered strategy exactly.
    /// Decoder errors and decoder panics both come back as `ExtractionFailed`.
    pub async fn dispatch(&self, path: &Path, mime_type: &str) -> Result<String> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(Error::FileNotFound(path.display().to_string())),
            Err(e) => {
                return Err(Error::FileNotFound(format!("{}: {}", path.display(), e)));
            }
        }

        let extractor = self
            .strategies
            .get(mime_type)
            .cloned()
            .ok_or_else(|| Error::UnsupportedFormat(mime_type.to_string()))?;

        let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.display().to_string()),
            _ => Error::internal(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        let strategy = extractor.name();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(strategy, bytes = data.len(), file = %display_name, "Dispatching extraction");

        let text = tokio::task::spawn_blocking(move || extractor.extract(&data))
            .await
            .map_err(|e| {
                Error::extraction(
                    display_name.as_str(),
                    format!("{} decoder aborted: {}", strategy, e),
                )
            })??;

        Ok(text)
    }
}
