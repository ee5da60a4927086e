//! Domain models for Cartbot.
//!
//! ## Submodules
//!
//! - [`product`] - Product types (ProductSummary)
//! - [`chat`] - Chat types (ChatOutcome)
//! - [`resource`] - Notification types (Resource, ResourceStream)

mod chat;
mod product;
mod resource;

// Re-export everything at the models level
pub use chat::ChatOutcome;
pub use product::ProductSummary;
pub use resource::{first_terminal, Resource, ResourceStream};
