//! Streaming response pipeline.
//!
//! ```text
//! Raw Bytes → NdjsonDecoder → ChunkMapper → ResponseChunk stream
//!     │            │               │
//!   HTTP      line framing,   mode-aware mapping,
//!             JSON parsing    done/truncation semantics
//! ```
//!
//! The output is a lazy, forward-only, non-restartable sequence: one chunk
//! is produced per pull, in arrival order, and nothing is read ahead of the
//! consumer.

pub mod accumulate;
pub mod chunk_map;
pub mod decode;

#[cfg(test)]
mod tests;

pub use accumulate::ChunkAccumulator;
pub use chunk_map::ChunkMapper;
pub use decode::NdjsonDecoder;

use crate::request::Mode;
use crate::types::ResponseChunk;
use crate::{BoxStream, Result};

/// A pinned, boxed stream of response chunks.
pub type ChunkStream = BoxStream<'static, ResponseChunk>;

/// Decoder seam: turns a byte stream into framed JSON values.
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, bytes::Bytes>,
    ) -> Result<BoxStream<'static, serde_json::Value>>;
}

/// Compose the full pipeline for one response body.
///
/// `http_status` is attached to in-band server error objects so they carry
/// the status of the exchange they arrived on.
pub(crate) async fn chunk_stream(
    mode: Mode,
    http_status: u16,
    input: BoxStream<'static, bytes::Bytes>,
) -> Result<ChunkStream> {
    let values = NdjsonDecoder.decode_stream(input).await?;
    Ok(ChunkMapper::new(mode, http_status).map_stream(values))
}
