use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for failures detected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "request.messages", "schema.required[2]")
    pub field_path: Option<String>,
    /// Additional context (e.g., expected shape, offending value)
    pub details: Option<String>,
    /// Source of the error (e.g., "endpoint_resolver", "request_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the client.
///
/// The taxonomy is deliberately small: configuration and validation failures
/// happen before any I/O, everything else is surfaced from a live exchange.
/// Nothing here is retried internally — a retried generation is not a
/// resumption, so retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Server error: HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Decode error: malformed response line: {line:?}")]
    Decode { line: String },

    #[error("Stream closed before a terminal done chunk was observed")]
    TruncatedStream,

    #[error("Call cancelled by the consumer")]
    Cancelled,

    #[error("Call deadline elapsed before completion")]
    TimedOut,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a validation error with structured context.
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a validation error without extra context.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    /// Create a configuration error with structured context.
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// True when the failure was produced before any network activity.
    ///
    /// These fail on every dispatch until the caller fixes the input, so
    /// application-level retry loops should not re-attempt them.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. } | Error::Validation { .. }
        )
    }

    /// True when the call was ended by the consumer or a deadline rather
    /// than by a model/server fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::TimedOut)
    }

    /// Classify a raw `reqwest` failure into the taxonomy.
    ///
    /// Deadline trips are reported as [`Error::TimedOut`] so callers can
    /// distinguish them from connection faults; everything else is a
    /// transport failure.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::TimedOut
        } else {
            Error::Transport(TransportError::Http(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_faults_are_pre_io() {
        assert!(Error::validation("bad role").is_caller_fault());
        assert!(Error::configuration_with_context("bad url", ErrorContext::new()).is_caller_fault());
        assert!(!Error::TruncatedStream.is_caller_fault());
        assert!(!Error::Server {
            status: 500,
            body: String::new()
        }
        .is_caller_fault());
    }

    #[test]
    fn cancellation_is_not_a_server_fault() {
        assert!(Error::Cancelled.is_cancellation());
        assert!(Error::TimedOut.is_cancellation());
        assert!(!Error::TruncatedStream.is_cancellation());
    }

    #[test]
    fn context_is_rendered_in_display() {
        let err = Error::validation_with_context(
            "chat requires at least one message",
            ErrorContext::new()
                .with_field_path("request.messages")
                .with_source("request_builder"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("request.messages"));
        assert!(rendered.contains("request_builder"));
    }
}
