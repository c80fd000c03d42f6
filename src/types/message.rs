//! Role-tagged conversation messages.

use crate::{Error, ErrorContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One turn of a conversation. Ordering within a request is significant and
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(Role::Tool, text)
    }

    /// Build a message from an untyped role string, rejecting unrecognized
    /// roles before any network activity.
    pub fn from_parts(role: &str, content: impl Into<String>) -> crate::Result<Self> {
        Ok(Self::new(role.parse()?, content))
    }
}

/// Message role. Only these four values are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "tool" => Ok(Role::Tool),
            other => Err(Error::validation_with_context(
                format!("unrecognized message role {:?}", other),
                ErrorContext::new()
                    .with_field_path("message.role")
                    .with_details("expected one of: system, user, assistant, tool")
                    .with_source("request_builder"),
            )),
        }
    }
}
