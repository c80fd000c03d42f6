//! Fragment accumulation into a [`FinalResult`].

use crate::request::Mode;
use crate::types::message::Role;
use crate::types::{FinalResult, Message, ResponseChunk};

/// Accumulates chunks in arrival order. Later fragments have no meaning
/// independent of the concatenation order established by earlier ones, so
/// the dispatcher feeds this strictly sequentially.
#[derive(Debug)]
pub struct ChunkAccumulator {
    mode: Mode,
    content: String,
    role: Option<Role>,
}

impl ChunkAccumulator {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            content: String::new(),
            role: None,
        }
    }

    pub fn push(&mut self, chunk: &ResponseChunk) {
        match chunk {
            ResponseChunk::Completion { content, .. } => self.content.push_str(content),
            ResponseChunk::Chat { message, .. } => {
                self.role = Some(message.role);
                self.content.push_str(&message.content);
            }
        }
    }

    pub fn finish(self) -> FinalResult {
        match self.mode {
            Mode::Completion => FinalResult::Completion(self.content),
            Mode::Chat => FinalResult::Chat(Message::new(
                self.role.unwrap_or(Role::Assistant),
                self.content,
            )),
        }
    }
}
