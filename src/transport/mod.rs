//! HTTP transport on top of a pooled `reqwest` client.

mod http;

pub use http::{HttpTransport, TransportError};
