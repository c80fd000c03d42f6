//! Client interface: request dispatch and lifecycle ownership.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod control;
pub mod core;
mod dispatch;
pub mod stats;

pub use builder::ClientBuilder;
pub use control::{cancel_pair, CancelHandle, ChunkAction, ControlledStream};
pub use core::OllamaClient;
pub use stats::CallStats;
