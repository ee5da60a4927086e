//! Host APIs used by the backend adapters.
//!
//! - [`http`] - HTTP client with tracing, retries, and domain allowlist

pub mod http;
