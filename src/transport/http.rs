use crate::config::Endpoint;
use crate::Result;
use std::time::Duration;

/// Thin wrapper around a pooled `reqwest::Client` bound to one endpoint.
///
/// The inner client is safe for concurrent use by multiple in-flight calls;
/// independent dispatches share only the connection pool.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        // A whole-request timeout would cut long generations short, so it is
        // opt-in. Connect timeout stays bounded either way.
        builder = builder.connect_timeout(Duration::from_secs(10));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// POST a JSON body and return the raw response.
    ///
    /// Status handling and body consumption are the dispatcher's concern;
    /// this only moves the request onto the wire.
    pub(crate) async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint.join(path);
        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(crate::Error::from_reqwest)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
