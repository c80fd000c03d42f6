//! Per-call facts for application-layer observability.

/// Facts about one completed dispatch. Facts only, no policy.
#[derive(Debug, Clone)]
pub struct CallStats {
    /// Model the request was addressed to.
    pub model: String,
    /// API path the request was POSTed to.
    pub endpoint: String,
    /// HTTP status of the exchange.
    pub http_status: u16,
    /// Wall-clock duration of the whole call.
    pub duration_ms: u128,
    /// Number of chunks delivered to the handler.
    pub chunk_count: usize,
    /// Client-generated correlation id, also attached to log events.
    pub client_request_id: String,
}
