//! Application state for the upload server

use std::sync::Arc;

use crate::config::ExtractConfig;
use crate::ingestion::{IngestPipeline, StagingArea, StreamCollector};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ExtractConfig,
    /// Scratch directory for file parts
    staging: StagingArea,
    /// Body collector bounded by the upload limit
    collector: StreamCollector,
    /// Format dispatch and extraction
    pipeline: IngestPipeline,
}

impl AppState {
    /// Create state with the built-in extraction strategies
    pub fn new(config: ExtractConfig) -> Self {
        Self::with_pipeline(config, IngestPipeline::with_defaults())
    }

    /// Create state around a custom pipeline
    pub fn with_pipeline(config: ExtractConfig, pipeline: IngestPipeline) -> Self {
        tracing::info!(
            staging_dir = %config.upload.staging_dir.display(),
            formats = ?pipeline.dispatcher().supported_types(),
            "Initializing upload state"
        );

        let staging = StagingArea::new(config.upload.staging_dir.clone());
        let collector = StreamCollector::new(config.server.max_upload_size);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                staging,
                collector,
                pipeline,
            }),
        }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.inner.config
    }

    pub fn staging(&self) -> &StagingArea {
        &self.inner.staging
    }

    pub fn collector(&self) -> &StreamCollector {
        &self.inner.collector
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }
}
