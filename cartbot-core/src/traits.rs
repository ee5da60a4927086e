//! Trait definitions for Cartbot.
//!
//! The assistant talks to the outside world through two collaborators: a
//! chat transport that relays a user message to the backend assistant, and
//! a product catalog that resolves product identifiers. Both report their
//! progress as notification streams so callers can show a loading state.

use crate::models::{ProductSummary, ResourceStream};

/// Relays a chat message to the backend assistant.
///
/// Implementors perform a single request/response round-trip and wrap it in
/// a notification stream:
/// - `Loading` while the request is in flight (optional)
/// - `Success(raw_response_text)` with the assistant's unprocessed reply
/// - `Error(message)` on network, timeout, or non-success status
pub trait ChatTransport: Send + Sync {
    /// Sends `text` and returns the notification stream for the reply.
    fn send_message(&self, text: &str) -> ResourceStream<String>;
}

/// Looks up full product records by identifier.
pub trait ProductCatalog: Send + Sync {
    /// Fetches the product named by `id`.
    ///
    /// A product that does not exist is reported as `Error`; a stream that
    /// ends without any terminal notification is treated as "not found" by
    /// consumers.
    fn product_detail(&self, id: &str) -> ResourceStream<ProductSummary>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    fn send_message(&self, text: &str) -> ResourceStream<String> {
        (**self).send_message(text)
    }
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for std::sync::Arc<T> {
    fn product_detail(&self, id: &str) -> ResourceStream<ProductSummary> {
        (**self).product_detail(id)
    }
}
