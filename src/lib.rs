//! # ollama-stream
//!
//! Streaming completion client for Ollama-compatible model servers.
//!
//! ## Overview
//!
//! This library hardens the pattern every local-LLM tutorial repeats:
//! construct a completion request (single-prompt or multi-turn chat),
//! dispatch it to a model server over HTTP, and incrementally consume a
//! streamed, newline-delimited JSON response — with an alternate
//! non-streaming / schema-constrained mode. The client moves structured
//! data only; it never parses or evaluates model output content.
//!
//! ## Core Philosophy
//!
//! - **Pull-based streaming**: the response is a cancellable sequence, not
//!   an always-continue callback; early termination is a first-class,
//!   testable control path
//! - **Validate before I/O**: malformed requests never reach the wire
//! - **Fail fast**: no internal retries — a retried generation is not a
//!   resumption, so retry policy stays with the caller
//! - **Type-Safe**: strongly typed requests, chunks, and error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ollama_stream::{ChunkAction, CompletionRequest, OllamaClient};
//!
//! #[tokio::main]
//! async fn main() -> ollama_stream::Result<()> {
//!     let client = OllamaClient::from_env()?;
//!
//!     let request = CompletionRequest::builder("granite3-moe:1b", "why is the sky blue?")
//!         .build()?;
//!
//!     let answer = client
//!         .dispatch(&request, |chunk| {
//!             print!("{}", chunk.fragment());
//!             ChunkAction::Continue
//!         })
//!         .await?;
//!
//!     println!("\n---\n{}", answer.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Endpoint resolution (`OLLAMA_HOST`, localhost default) |
//! | [`request`] | Immutable request construction and validation |
//! | [`pipeline`] | NDJSON decoding and chunk mapping |
//! | [`client`] | Dispatcher, cancellation, per-call stats |
//! | [`types`] | Messages, options, output formats, chunks |
//! | [`transport`] | Pooled HTTP transport |
//! | [`error`] | Error taxonomy and classification helpers |

pub mod client;
pub mod config;
pub mod pipeline;
pub mod request;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{CallStats, CancelHandle, ChunkAction, ClientBuilder, ControlledStream, OllamaClient};
pub use config::{Endpoint, DEFAULT_HOST, HOST_ENV_VAR};
pub use pipeline::ChunkStream;
pub use request::{ChatRequest, CompletionRequest, Mode, Request};
pub use types::{
    FinalResult, GenerateOptions, JsonSchema, Message, OutputFormat, ResponseChunk, Role,
    SchemaBuilder,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
