// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Cartbot Fetch
//!
//! HTTP plumbing between Cartbot and the remote commerce backend.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing, retries, bearer auth and
//!   a domain allowlist
//!
//! ## Backend
//!
//! - [`backend::BackendClient`] - Implements `ChatTransport` and
//!   `ProductCatalog` over REST
//! - [`dto`] - Wire types and their mapping to domain models
//! - [`settings::BackendSettings`] - Base URL, timeout, token, retry
//!
//! ## Example
//!
//! ```ignore
//! use cartbot_core::ChatTransport;
//! use cartbot_fetch::{BackendClient, BackendSettings};
//!
//! let client = BackendClient::new(&BackendSettings::new("https://shop.example.com/api"))?;
//! let mut replies = client.send_message("I need a kettle");
//! while let Some(notification) = replies.next().await {
//!     println!("{notification:?}");
//! }
//! ```

pub mod backend;
pub mod dto;
pub mod error;
pub mod host;
pub mod retry;
pub mod settings;

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{HttpClient, ResponseExt};

// Backend
pub use backend::{status_error, BackendClient};
pub use dto::{parse_chat_reply, parse_product};
pub use retry::RetryStrategy;
pub use settings::{BackendSettings, DEFAULT_BASE_URL};
