//! Request body collection
//!
//! The multipart decoder never touches the transport directly. It reads from a
//! [`ByteSource`], which is either the live request body or a buffer that the
//! [`StreamCollector`] has already drained.

use axum::body::{Body, HttpBody};
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::{Error, Result};

/// Boxed error carried by chunk streams
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stream of body chunks handed to the collector or the decoder
pub type ChunkStream = BoxStream<'static, std::result::Result<Bytes, BoxError>>;

/// A transport-agnostic source of body bytes
pub trait ByteSource: Send + 'static {
    /// True when the source is known to carry no payload at all
    fn is_absent(&self) -> bool;

    /// Consume the source as a stream of chunks
    fn into_chunks(self) -> ChunkStream;
}

impl ByteSource for Body {
    fn is_absent(&self) -> bool {
        HttpBody::size_hint(self).exact() == Some(0)
    }

    fn into_chunks(self) -> ChunkStream {
        self.into_data_stream()
            .map(|chunk| chunk.map_err(|e| Box::new(e) as BoxError))
            .boxed()
    }
}

impl ByteSource for Bytes {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }

    fn into_chunks(self) -> ChunkStream {
        stream::once(async move { Ok::<_, BoxError>(self) }).boxed()
    }
}

/// Adapter for any stream of byte chunks
pub struct StreamSource<S>(pub S);

impl<S, E> ByteSource for StreamSource<S>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn is_absent(&self) -> bool {
        false
    }

    fn into_chunks(self) -> ChunkStream {
        self.0.map(|chunk| chunk.map_err(Into::<BoxError>::into)).boxed()
    }
}

/// Drains a chunked body into one contiguous buffer
#[derive(Debug, Clone, Copy)]
pub struct StreamCollector {
    max_bytes: usize,
}

impl StreamCollector {
    /// Create a collector that refuses bodies larger than `max_bytes`
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Collect the whole source into memory
    pub async fn collect<S: ByteSource>(&self, source: Option<S>) -> Result<Bytes> {
        let source = match source {
            Some(source) if !source.is_absent() => source,
            _ => return Err(Error::MissingBody),
        };

        let mut chunks = source.into_chunks();
        let mut buffer = BytesMut::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk
                .map_err(|e| Error::invalid_upload(format!("Failed to read request body: {}", e)))?;

            if buffer.len() + chunk.len() > self.max_bytes {
                return Err(Error::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            return Err(Error::MissingBody);
        }

        tracing::debug!(bytes = buffer.len(), "Collected request body");
        Ok(buffer.freeze())
    }
}
