//! Mode-aware mapping (JSON Value -> ResponseChunk).
//!
//! Terminal semantics live here: the sequence ends normally exactly when a
//! chunk with `done == true` is observed, and an underlying stream that
//! closes first ends the sequence with a truncation error so callers can
//! tell "model finished" from "connection died mid-generation".

use crate::pipeline::ChunkStream;
use crate::request::Mode;
use crate::types::chunk::{ChatChunkWire, CompletionChunkWire};
use crate::types::{Message, ResponseChunk};
use crate::{BoxStream, Error, Result};
use futures::{stream, StreamExt};
use serde_json::Value;

pub struct ChunkMapper {
    mode: Mode,
    http_status: u16,
}

impl ChunkMapper {
    pub fn new(mode: Mode, http_status: u16) -> Self {
        Self { mode, http_status }
    }

    /// Map one decoded object to a chunk.
    ///
    /// Any object carrying a non-empty `error` indicator is a server error
    /// regardless of its `done` value.
    pub(crate) fn map_value(mode: Mode, http_status: u16, value: &Value) -> Result<ResponseChunk> {
        if let Some(error) = value.get("error") {
            let body = match error {
                Value::String(s) if !s.is_empty() => s.clone(),
                Value::String(_) | Value::Null => String::new(),
                other => other.to_string(),
            };
            if !body.is_empty() {
                return Err(Error::Server {
                    status: http_status,
                    body,
                });
            }
        }

        // A parseable line with the wrong shape is the same category of
        // protocol garbage as an unparseable one.
        let shape_error = || Error::Decode {
            line: value.to_string(),
        };

        match mode {
            Mode::Completion => {
                let wire: CompletionChunkWire =
                    serde_json::from_value(value.clone()).map_err(|_| shape_error())?;
                Ok(ResponseChunk::Completion {
                    content: wire.response,
                    done: wire.done,
                })
            }
            Mode::Chat => {
                let wire: ChatChunkWire =
                    serde_json::from_value(value.clone()).map_err(|_| shape_error())?;
                let message = wire
                    .message
                    .map(|m| Message::new(m.role, m.content))
                    .unwrap_or_else(|| Message::assistant(""));
                Ok(ResponseChunk::Chat {
                    message,
                    done: wire.done,
                })
            }
        }
    }

    /// Map a value stream to a chunk stream with terminal semantics.
    pub fn map_stream(&self, input: BoxStream<'static, Value>) -> ChunkStream {
        let mode = self.mode;
        let http_status = self.http_status;

        let stream = stream::unfold((input, false), move |(mut input, ended)| async move {
            if ended {
                return None;
            }
            match input.next().await {
                Some(Ok(value)) => match Self::map_value(mode, http_status, &value) {
                    Ok(chunk) => {
                        let done = chunk.is_done();
                        Some((Ok(chunk), (input, done)))
                    }
                    Err(e) => Some((Err(e), (input, true))),
                },
                Some(Err(e)) => Some((Err(e), (input, true))),
                None => Some((Err(Error::TruncatedStream), (input, true))),
            }
        });

        Box::pin(stream)
    }
}
