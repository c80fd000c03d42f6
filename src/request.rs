//! Request construction and wire serialization.
//!
//! A [`Request`] is built once per call, validated before any network
//! activity, dispatched once, and discarded after its response is fully
//! consumed or the call fails. Fields are private so a built request cannot
//! be mutated.

use crate::types::{GenerateOptions, Message, OutputFormat};
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Value};

/// Request mode: single-prompt completion or multi-turn chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Completion,
    Chat,
}

/// An immutable, validated completion or chat request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Completion(CompletionRequest),
    Chat(ChatRequest),
}

impl Request {
    pub fn mode(&self) -> Mode {
        match self {
            Request::Completion(_) => Mode::Completion,
            Request::Chat(_) => Mode::Chat,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Request::Completion(r) => &r.model,
            Request::Chat(r) => &r.model,
        }
    }

    /// Whether the response is delivered as successive fragments.
    pub fn streams(&self) -> bool {
        match self {
            Request::Completion(r) => r.stream,
            Request::Chat(r) => r.stream,
        }
    }

    /// API path this request is POSTed to.
    pub(crate) fn path(&self) -> &'static str {
        match self {
            Request::Completion(_) => "/api/generate",
            Request::Chat(_) => "/api/chat",
        }
    }

    /// Serialize to the wire body.
    pub(crate) fn to_body(&self) -> Value {
        match self {
            Request::Completion(r) => {
                let mut body = json!({
                    "model": r.model,
                    "prompt": r.prompt,
                    "stream": r.stream,
                });
                finish_body(&mut body, &r.options, &r.format, &r.keep_alive);
                body
            }
            Request::Chat(r) => {
                let mut body = json!({
                    "model": r.model,
                    "messages": r.messages,
                    "stream": r.stream,
                });
                finish_body(&mut body, &r.options, &r.format, &r.keep_alive);
                body
            }
        }
    }
}

fn finish_body(
    body: &mut Value,
    options: &GenerateOptions,
    format: &OutputFormat,
    keep_alive: &Option<String>,
) {
    let obj = body.as_object_mut().expect("request body is an object");
    if !options.is_empty() {
        obj.insert(
            "options".into(),
            serde_json::to_value(options).expect("options serialize"),
        );
    }
    if let Some(format) = format.to_wire() {
        obj.insert("format".into(), format);
    }
    if let Some(keep_alive) = keep_alive {
        obj.insert("keep_alive".into(), json!(keep_alive));
    }
}

/// Single-prompt request without conversational role structure.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    model: String,
    prompt: String,
    options: GenerateOptions,
    format: OutputFormat,
    stream: bool,
    keep_alive: Option<String>,
}

impl CompletionRequest {
    pub fn builder(model: impl Into<String>, prompt: impl Into<String>) -> CompletionBuilder {
        CompletionBuilder {
            model: model.into(),
            prompt: prompt.into(),
            options: GenerateOptions::default(),
            format: OutputFormat::Text,
            stream: true,
            keep_alive: None,
        }
    }
}

/// Builder for [`CompletionRequest`]. Streaming defaults to on.
#[derive(Debug, Clone)]
pub struct CompletionBuilder {
    model: String,
    prompt: String,
    options: GenerateOptions,
    format: OutputFormat,
    stream: bool,
    keep_alive: Option<String>,
}

impl CompletionBuilder {
    pub fn options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Explicit streaming flag; the default is `true`.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// How long the server keeps the model loaded after the call (e.g. "5m").
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    pub fn build(self) -> Result<Request> {
        if self.model.trim().is_empty() {
            return Err(empty_model_error());
        }
        Ok(Request::Completion(CompletionRequest {
            model: self.model,
            prompt: self.prompt,
            options: self.options,
            format: self.format,
            stream: self.stream,
            keep_alive: self.keep_alive,
        }))
    }
}

/// Ordered, role-tagged multi-turn request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    options: GenerateOptions,
    format: OutputFormat,
    stream: bool,
    keep_alive: Option<String>,
}

impl ChatRequest {
    pub fn builder(model: impl Into<String>) -> ChatBuilder {
        ChatBuilder {
            model: model.into(),
            messages: Vec::new(),
            options: GenerateOptions::default(),
            format: OutputFormat::Text,
            stream: true,
            keep_alive: None,
        }
    }
}

/// Builder for [`ChatRequest`]. Streaming defaults to on.
#[derive(Debug, Clone)]
pub struct ChatBuilder {
    model: String,
    messages: Vec<Message>,
    options: GenerateOptions,
    format: OutputFormat,
    stream: bool,
    keep_alive: Option<String>,
}

impl ChatBuilder {
    /// Append one message. Order is preserved on the wire.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Replace the message list.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Explicit streaming flag; the default is `true`.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// How long the server keeps the model loaded after the call (e.g. "5m").
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    pub fn build(self) -> Result<Request> {
        if self.model.trim().is_empty() {
            return Err(empty_model_error());
        }
        if self.messages.is_empty() {
            return Err(Error::validation_with_context(
                "chat requires at least one message",
                ErrorContext::new()
                    .with_field_path("request.messages")
                    .with_source("request_builder"),
            ));
        }
        Ok(Request::Chat(ChatRequest {
            model: self.model,
            messages: self.messages,
            options: self.options,
            format: self.format,
            stream: self.stream,
            keep_alive: self.keep_alive,
        }))
    }
}

fn empty_model_error() -> Error {
    Error::validation_with_context(
        "model name must be non-empty",
        ErrorContext::new()
            .with_field_path("request.model")
            .with_source("request_builder"),
    )
}
