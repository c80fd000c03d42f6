use crate::client::core::OllamaClient;
use crate::config::Endpoint;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for clients with custom configuration.
///
/// Keep this surface small and predictable: one endpoint override, one HTTP
/// timeout, one per-call deadline.
pub struct ClientBuilder {
    endpoint: Option<Endpoint>,
    host: Option<String>,
    timeout: Option<Duration>,
    deadline: Option<Duration>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            host: None,
            timeout: None,
            deadline: None,
        }
    }

    /// Use a pre-resolved endpoint.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Override the server address with a raw URL string, validated at
    /// `build()`. Takes effect only when no resolved endpoint was set.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Whole-request HTTP timeout. Off by default: a hard timeout would cut
    /// long generations short.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Per-dispatch deadline, checked before each chunk read. On trip the
    /// in-flight read is aborted and the call ends in `TimedOut`.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn build(self) -> Result<OllamaClient> {
        let endpoint = match self.endpoint {
            Some(ep) => ep,
            None => Endpoint::resolve(self.host.as_deref())?,
        };
        let transport = Arc::new(HttpTransport::new(endpoint, self.timeout)?);
        Ok(OllamaClient {
            transport,
            deadline: self.deadline,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
