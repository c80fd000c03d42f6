//! Request/response lifecycle: serialize, transmit, classify the status,
//! and hand the body to the pipeline.
//!
//! The lifecycle is `Idle → Sending → (Streaming | AwaitingFullBody) →
//! Completed | Failed | Cancelled`, expressed as control flow: `open()`
//! covers Sending and the branch into the two consuming states, the
//! returned stream carries the call to its terminal state.

use crate::pipeline::{self, ChunkMapper, ChunkStream};
use crate::request::Request;
use crate::types::ResponseChunk;
use crate::{Error, Result};
use futures::TryStreamExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::core::OllamaClient;

/// Facts captured while opening one exchange.
pub(crate) struct DispatchMeta {
    pub client_request_id: String,
    pub http_status: u16,
    pub start: std::time::Instant,
}

impl OllamaClient {
    /// Send the request and return the chunk source for its response.
    ///
    /// Single attempt, fail fast: every failure surfaces to the caller,
    /// since a silent retry against a generation endpoint could duplicate
    /// partially generated content.
    pub(crate) async fn open(&self, request: &Request) -> Result<(ChunkStream, DispatchMeta)> {
        let client_request_id = Uuid::new_v4().to_string();
        let start = std::time::Instant::now();
        let body = request.to_body();

        debug!(
            model = request.model(),
            endpoint = request.path(),
            stream = request.streams(),
            client_request_id = client_request_id.as_str(),
            "dispatching request"
        );

        let resp = match self.transport.post(request.path(), &body).await {
            Ok(resp) => resp,
            Err(e) => {
                info!(
                    model = request.model(),
                    endpoint = request.path(),
                    duration_ms = start.elapsed().as_millis(),
                    client_request_id = client_request_id.as_str(),
                    error = %e,
                    "dispatch failed before a response"
                );
                return Err(e);
            }
        };

        let http_status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            info!(
                model = request.model(),
                endpoint = request.path(),
                http_status,
                duration_ms = start.elapsed().as_millis(),
                client_request_id = client_request_id.as_str(),
                "server rejected request"
            );
            return Err(Error::Server {
                status: http_status,
                body,
            });
        }

        let meta = DispatchMeta {
            client_request_id,
            http_status,
            start,
        };

        if request.streams() {
            let bytes = Box::pin(resp.bytes_stream().map_err(Error::from_reqwest));
            let chunks = pipeline::chunk_stream(request.mode(), http_status, bytes).await?;
            Ok((chunks, meta))
        } else {
            // AwaitingFullBody: one JSON object carrying the full content.
            let value: serde_json::Value = resp.json().await.map_err(Error::from_reqwest)?;
            let chunk = ChunkMapper::map_value(request.mode(), http_status, &value)?;
            // A full body is terminal by definition; deliver it as the one
            // done chunk even if the server omitted the flag.
            let chunk = match chunk {
                ResponseChunk::Completion { content, .. } => ResponseChunk::Completion {
                    content,
                    done: true,
                },
                ResponseChunk::Chat { message, .. } => ResponseChunk::Chat {
                    message,
                    done: true,
                },
            };
            let chunks: ChunkStream = Box::pin(futures::stream::once(async move { Ok(chunk) }));
            Ok((chunks, meta))
        }
    }
}
