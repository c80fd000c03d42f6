//! Endpoint resolution.
//!
//! The server address is resolved once into an explicit [`Endpoint`] value
//! that is passed into the client constructor; there is no hidden
//! process-wide state. `OLLAMA_HOST` is the conventional override, read only
//! when the caller asks for it via [`Endpoint::from_env`].

use crate::{Error, ErrorContext, Result};
use url::Url;

/// Default base address of a local model server.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Conventional environment variable carrying the endpoint override.
pub const HOST_ENV_VAR: &str = "OLLAMA_HOST";

/// A validated base URL of a model server. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// Resolve an endpoint from an optional override string.
    ///
    /// With no override the fixed default `http://localhost:11434` is used.
    /// An override must parse as an absolute `http`/`https` URL, otherwise
    /// this fails with a configuration error. Pure: no side effects beyond
    /// validation.
    pub fn resolve(raw: Option<&str>) -> Result<Self> {
        let raw = match raw {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => DEFAULT_HOST,
        };

        let base = Url::parse(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint URL {:?}: {}", raw, e),
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_source("endpoint_resolver"),
            )
        })?;

        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::configuration_with_context(
                    format!("unsupported endpoint scheme {:?}", other),
                    ErrorContext::new()
                        .with_field_path("endpoint")
                        .with_details(format!("url: {}", base))
                        .with_source("endpoint_resolver"),
                ));
            }
        }

        Ok(Self { base })
    }

    /// Resolve from the conventional `OLLAMA_HOST` environment variable,
    /// falling back to the default when the variable is absent or empty.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(HOST_ENV_VAR).ok();
        Self::resolve(raw.as_deref())
    }

    /// The validated base URL.
    pub fn url(&self) -> &Url {
        &self.base
    }

    /// Join an API path (e.g. `/api/generate`) onto the base.
    pub(crate) fn join(&self, path: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        // DEFAULT_HOST is a valid constant URL.
        Self {
            base: Url::parse(DEFAULT_HOST).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_when_no_override() {
        let ep = Endpoint::resolve(None).unwrap();
        assert_eq!(ep.url().as_str(), "http://localhost:11434/");
        assert_eq!(ep, Endpoint::default());
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let ep = Endpoint::resolve(Some("  ")).unwrap();
        assert_eq!(ep, Endpoint::default());
    }

    #[test]
    fn override_is_validated() {
        let ep = Endpoint::resolve(Some("http://10.0.0.7:11434")).unwrap();
        assert_eq!(ep.join("/api/generate"), "http://10.0.0.7:11434/api/generate");

        let err = Endpoint::resolve(Some("not a url")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = Endpoint::resolve(Some("ftp://example.com")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn join_handles_trailing_slash() {
        let ep = Endpoint::resolve(Some("http://localhost:11434/")).unwrap();
        assert_eq!(ep.join("/api/chat"), "http://localhost:11434/api/chat");
    }
}
