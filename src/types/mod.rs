//! Core type definitions: messages, tuning options, output formats, and
//! response chunks.

pub mod chunk;
pub mod format;
pub mod message;
pub mod options;

pub use chunk::{FinalResult, ResponseChunk};
pub use format::{JsonSchema, OutputFormat, SchemaBuilder};
pub use message::{Message, Role};
pub use options::GenerateOptions;
