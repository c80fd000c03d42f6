//! NDJSON decoding (Bytes -> JSON Value).
//!
//! The transport may deliver arbitrary byte boundaries, not line boundaries
//! and not character boundaries either, so raw bytes are buffered across
//! reads and UTF-8 is decoded only once a complete line is framed. A line
//! that fails to decode or parse terminates the sequence: a garbled frame in
//! this protocol indicates a corrupted connection, not a recoverable event,
//! so no resynchronization on the next line is attempted.

use crate::pipeline::Decoder;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde_json::Value;

/// One JSON object per line, buffered incrementally.
pub struct NdjsonDecoder;

/// Decode one framed line. `None` means the line is blank.
fn parse_line(raw: &[u8]) -> Option<Result<Value>> {
    let line = match std::str::from_utf8(raw) {
        Ok(s) => s.trim(),
        Err(_) => {
            return Some(Err(Error::Decode {
                line: String::from_utf8_lossy(raw).into_owned(),
            }));
        }
    };
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(v) => Some(Ok(v)),
        Err(_) => Some(Err(Error::Decode {
            line: line.to_string(),
        })),
    }
}

#[async_trait::async_trait]
impl Decoder for NdjsonDecoder {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> Result<BoxStream<'static, Value>> {
        let stream = stream::unfold(
            (input, Vec::<u8>::new(), false),
            move |(mut input, mut buf, failed)| async move {
                if failed {
                    return None;
                }
                loop {
                    if let Some(idx) = buf.iter().position(|&b| b == b'\n') {
                        let raw: Vec<u8> = buf.drain(..=idx).collect();
                        match parse_line(&raw[..raw.len() - 1]) {
                            Some(Ok(v)) => return Some((Ok(v), (input, buf, false))),
                            Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                            None => continue,
                        }
                    }

                    match input.next().await {
                        Some(Ok(bytes)) => {
                            buf.extend_from_slice(&bytes);
                            continue;
                        }
                        Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                        None => {
                            // EOF: a complete object without a trailing
                            // newline still counts as a line. Unparsable
                            // leftovers never became a line; the cut-off
                            // surfaces downstream as truncation.
                            return match parse_line(&buf) {
                                Some(Ok(v)) => Some((Ok(v), (input, Vec::new(), false))),
                                _ => None,
                            };
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}
