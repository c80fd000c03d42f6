use crate::client::control::{cancel_pair, CancelHandle, ChunkAction, ControlledStream};
use crate::client::stats::CallStats;
use crate::config::Endpoint;
use crate::pipeline::ChunkAccumulator;
use crate::request::Request;
use crate::transport::HttpTransport;
use crate::types::{FinalResult, ResponseChunk};
use crate::{Error, Result};
use futures::StreamExt;
use std::sync::Arc;
use tracing::info;

/// Streaming completion client bound to one resolved endpoint.
///
/// A client is cheap to share: independent calls share only the pooled HTTP
/// connection, which is safe for concurrent use by multiple in-flight
/// dispatches. Per-call state lives entirely in the returned stream.
pub struct OllamaClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) deadline: Option<std::time::Duration>,
}

impl OllamaClient {
    /// Create a client for a resolved endpoint with default settings.
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        crate::client::builder::ClientBuilder::new()
            .endpoint(endpoint)
            .build()
    }

    /// Create a client from the conventional `OLLAMA_HOST` environment
    /// variable, defaulting to `http://localhost:11434`.
    pub fn from_env() -> Result<Self> {
        Self::new(Endpoint::from_env()?)
    }

    pub fn builder() -> crate::client::builder::ClientBuilder {
        crate::client::builder::ClientBuilder::new()
    }

    /// The endpoint this client dispatches to.
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Dispatch a request and return the response as a cancellable
    /// pull-based chunk stream.
    ///
    /// One chunk is in flight at a time: nothing is read from the
    /// connection ahead of the consumer. The stream yields exactly one
    /// chunk with `done == true` as its last item; a connection that closes
    /// earlier yields [`Error::TruncatedStream`] instead. Non-streaming
    /// requests yield exactly one terminal chunk.
    pub async fn stream(&self, request: &Request) -> Result<ControlledStream> {
        let (stream, _handle) = self.stream_with_cancel(request).await?;
        Ok(stream)
    }

    /// Like [`stream`](Self::stream), plus a handle that cancels the call
    /// from outside the consuming task.
    pub async fn stream_with_cancel(
        &self,
        request: &Request,
    ) -> Result<(ControlledStream, CancelHandle)> {
        let (chunks, _meta) = self.open(request).await?;
        let (handle, rx) = cancel_pair();
        let deadline = self.deadline.map(|d| tokio::time::Instant::now() + d);
        Ok((ControlledStream::new(chunks, Some(rx), deadline), handle))
    }

    /// Dispatch a request, driving a consumer handler chunk by chunk, and
    /// return the assembled [`FinalResult`].
    ///
    /// The handler is invoked synchronously, in arrival order, exactly once
    /// per chunk, before the next chunk is requested. Returning
    /// [`ChunkAction::Stop`] aborts the in-flight read, releases the
    /// connection, and ends the call with [`Error::Cancelled`].
    pub async fn dispatch<F>(&self, request: &Request, handler: F) -> Result<FinalResult>
    where
        F: FnMut(&ResponseChunk) -> ChunkAction,
    {
        let (result, _stats) = self.dispatch_with_stats(request, handler).await?;
        Ok(result)
    }

    /// [`dispatch`](Self::dispatch) with per-call facts for observability.
    pub async fn dispatch_with_stats<F>(
        &self,
        request: &Request,
        mut handler: F,
    ) -> Result<(FinalResult, CallStats)>
    where
        F: FnMut(&ResponseChunk) -> ChunkAction,
    {
        let (chunks, meta) = self.open(request).await?;
        let deadline = self.deadline.map(|d| tokio::time::Instant::now() + d);
        let mut stream = ControlledStream::new(chunks, None, deadline);

        let mut acc = ChunkAccumulator::new(request.mode());
        let mut chunk_count: usize = 0;

        while let Some(item) = stream.next().await {
            let chunk = item?;
            chunk_count += 1;
            let action = handler(&chunk);
            acc.push(&chunk);

            if chunk.is_done() {
                break;
            }
            if action == ChunkAction::Stop {
                // Dropping the stream aborts the in-flight read and
                // releases the connection.
                drop(stream);
                info!(
                    model = request.model(),
                    endpoint = request.path(),
                    chunks = chunk_count,
                    client_request_id = meta.client_request_id.as_str(),
                    "dispatch cancelled by consumer"
                );
                return Err(Error::Cancelled);
            }
        }

        let duration_ms = meta.start.elapsed().as_millis();
        info!(
            model = request.model(),
            endpoint = request.path(),
            http_status = meta.http_status,
            chunks = chunk_count,
            duration_ms,
            client_request_id = meta.client_request_id.as_str(),
            "dispatch completed"
        );

        let stats = CallStats {
            model: request.model().to_string(),
            endpoint: request.path().to_string(),
            http_status: meta.http_status,
            duration_ms,
            chunk_count,
            client_request_id: meta.client_request_id,
        };

        Ok((acc.finish(), stats))
    }
}
