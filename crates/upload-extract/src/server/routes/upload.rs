//! File upload endpoint

use axum::{body::Body, extract::State, http::HeaderMap, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::{boundary_from_headers, ByteSource, MultipartDecoder, StagedFiles};
use crate::server::state::AppState;
use crate::types::{DecodedUpload, UploadResponse};

/// POST /api/upload - Stage uploaded files and return their extracted text
pub async fn upload_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();
    let config = state.config();
    let decoder = MultipartDecoder::new(
        state.staging(),
        &config.upload.field_name,
        config.server.max_upload_size,
    );

    let decoded = if config.upload.buffer_body {
        let buffered = state.collector().collect(Some(body)).await?;
        let boundary = boundary_from_headers(&headers)?;
        state.staging().ensure().await?;
        decoder.decode(buffered, &boundary).await?
    } else {
        if body.is_absent() {
            return Err(Error::MissingBody);
        }
        let boundary = boundary_from_headers(&headers)?;
        state.staging().ensure().await?;
        decoder.decode(body, &boundary).await?
    };

    let DecodedUpload { files, fields } = decoded;
    if files.is_empty() {
        return Err(Error::NoFileUploaded);
    }

    tracing::info!(files = files.len(), "Processing upload");

    // Owns the staged files until disposal, including when the request is dropped
    let mut staged = StagedFiles::new(state.staging().clone());
    for part in files {
        staged.push(part);
    }

    let results = state.pipeline().extract_all(staged.parts()).await;

    if config.upload.retain_staged_files {
        staged.keep();
    } else {
        let removed = staged.dispose().await;
        tracing::debug!(removed, "Disposed staged files");
    }

    let response = UploadResponse::assemble(results)?.with_fields(fields);

    tracing::info!(
        files = response.file_contents.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Upload processed"
    );

    Ok(Json(response))
}
