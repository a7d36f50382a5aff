//! Multipart decoding into staged file parts

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use std::collections::BTreeMap;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::types::{DecodedUpload, FilePart};

use super::collector::ByteSource;
use super::staging::{StagedFiles, StagingArea};

/// Extract the multipart boundary from the request headers
pub fn boundary_from_headers(headers: &HeaderMap) -> Result<String> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| Error::invalid_upload("missing content-type header"))?
        .to_str()
        .map_err(|_| Error::invalid_upload("content-type header is not valid text"))?;

    multer::parse_boundary(content_type)
        .map_err(|e| Error::invalid_upload(format!("expected multipart/form-data: {}", e)))
}

/// Splits a multipart body into form fields and staged file parts
pub struct MultipartDecoder<'a> {
    staging: &'a StagingArea,
    field_name: &'a str,
    max_bytes: usize,
}

impl<'a> MultipartDecoder<'a> {
    /// Decoder writing parts of `field_name` into `staging`
    pub fn new(staging: &'a StagingArea, field_name: &'a str, max_bytes: usize) -> Self {
        Self {
            staging,
            field_name,
            max_bytes,
        }
    }

    /// Decode every part of the body.
    ///
    /// Parts staged so far are removed when decoding fails or the returned
    /// future is dropped.
    pub async fn decode<S: ByteSource>(&self, source: S, boundary: &str) -> Result<DecodedUpload> {
        let constraints = multer::Constraints::new()
            .size_limit(multer::SizeLimit::new().whole_stream(self.max_bytes as u64));
        let mut multipart =
            multer::Multipart::with_constraints(source.into_chunks(), boundary, constraints);

        let mut staged = StagedFiles::new(self.staging.clone());
        let mut fields = BTreeMap::new();
        match self.read_parts(&mut multipart, &mut staged, &mut fields).await {
            Ok(()) => {
                tracing::debug!(
                    files = staged.len(),
                    fields = fields.len(),
                    "Decoded multipart body"
                );
                Ok(DecodedUpload {
                    files: staged.keep(),
                    fields,
                })
            }
            Err(e) => {
                staged.dispose().await;
                Err(e)
            }
        }
    }

    async fn read_parts(
        &self,
        multipart: &mut multer::Multipart<'static>,
        staged: &mut StagedFiles,
        fields: &mut BTreeMap<String, Vec<String>>,
    ) -> Result<()> {
        while let Some(mut field) = multipart.next_field().await.map_err(decode_error)? {
            let name = field.name().unwrap_or("").to_string();

            let Some(original_filename) = field.file_name().map(str::to_string) else {
                let value = field.text().await.map_err(decode_error)?;
                fields.entry(name).or_default().push(value);
                continue;
            };

            if name != self.field_name {
                tracing::debug!(field = %name, "Skipping file part outside the upload field");
                while field.chunk().await.map_err(decode_error)?.is_some() {}
                continue;
            }

            let mime_type = field.content_type().map(|m| m.essence_str().to_string());
            let (staged_name, path) = self
                .staging
                .allocate(&original_filename, mime_type.as_deref());
            let mut file = self.staging.create(&path).await?;

            // Held by the guard before any bytes arrive so partial writes are cleaned up too
            staged.push(FilePart {
                original_filename,
                mime_type,
                staged_name,
                path,
                size: 0,
            });
            let size = copy_field(&mut field, &mut file).await?;
            drop(file);

            let Some(part) = staged.last_mut() else {
                continue;
            };
            part.size = size;

            // Browsers send an empty, nameless part for an untouched file input
            if part.size == 0 && part.original_filename.is_empty() {
                staged.discard_last().await;
                continue;
            }

            tracing::debug!(
                file = %part.original_filename,
                staged = %part.staged_name,
                bytes = part.size,
                "Staged file part"
            );
        }

        Ok(())
    }
}

async fn copy_field(field: &mut multer::Field<'static>, file: &mut tokio::fs::File) -> Result<u64> {
    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(decode_error)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::staging(format!("write failed: {}", e)))?;
        size += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| Error::staging(format!("flush failed: {}", e)))?;
    Ok(size)
}

fn decode_error(err: multer::Error) -> Error {
    match err {
        multer::Error::StreamSizeExceeded { limit } => Error::PayloadTooLarge {
            limit: limit as usize,
        },
        other => Error::invalid_upload(format!("Failed to read multipart field: {}", other)),
    }
}
