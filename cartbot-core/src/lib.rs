// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Cartbot Core
//!
//! Core types, models, and traits for the Cartbot shopping assistant.
//!
//! This crate provides the foundational abstractions used across all other
//! Cartbot crates, including:
//!
//! - Domain models (products, chat outcomes)
//! - The three-kind notification type carried on every stream
//! - Error types
//! - Collaborator traits for the chat backend and the product catalog
//!
//! ## Key Types
//!
//! ### Commerce Types
//! - [`ProductSummary`] - A product as shown in a recommendation list
//!
//! ### Chat Types
//! - [`ChatOutcome`] - Clean assistant text plus resolved recommendations
//!
//! ### Notifications
//! - [`Resource`] - `Loading`, `Success(T)` or `Error(message)`
//! - [`ResourceStream`] - Boxed stream of notifications

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{first_terminal, ChatOutcome, ProductSummary, Resource, ResourceStream};

// Re-export traits
pub use traits::{ChatTransport, ProductCatalog};
