//! Response chunks and the assembled final result.

use crate::types::message::Message;
use serde::Deserialize;

/// One unit of a streamed response.
///
/// Exactly one chunk in a well-formed stream has `done == true`, and it is
/// the last one delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseChunk {
    /// Completion mode: a content fragment.
    Completion { content: String, done: bool },
    /// Chat mode: a message fragment.
    Chat { message: Message, done: bool },
}

impl ResponseChunk {
    /// Terminal marker.
    pub fn is_done(&self) -> bool {
        match self {
            ResponseChunk::Completion { done, .. } | ResponseChunk::Chat { done, .. } => *done,
        }
    }

    /// The textual fragment carried by this chunk.
    pub fn fragment(&self) -> &str {
        match self {
            ResponseChunk::Completion { content, .. } => content,
            ResponseChunk::Chat { message, .. } => &message.content,
        }
    }
}

/// The fully consumed response: fragment concatenation in completion mode,
/// the assembled final message in chat mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalResult {
    Completion(String),
    Chat(Message),
}

impl FinalResult {
    /// The response text regardless of mode.
    pub fn text(&self) -> &str {
        match self {
            FinalResult::Completion(content) => content,
            FinalResult::Chat(message) => &message.content,
        }
    }

    /// The final message, if this was a chat exchange.
    pub fn message(&self) -> Option<&Message> {
        match self {
            FinalResult::Completion(_) => None,
            FinalResult::Chat(message) => Some(message),
        }
    }
}

/// Wire shape of one completion-mode stream object.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChunkWire {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Wire shape of one chat-mode stream object.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatChunkWire {
    pub message: Option<MessageWire>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageWire {
    pub role: crate::types::message::Role,
    #[serde(default)]
    pub content: String,
}
