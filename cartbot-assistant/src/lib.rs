// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Cartbot Assistant
//!
//! Turns a raw assistant reply into something a storefront can render: the
//! readable text plus a list of resolved product recommendations.
//!
//! ## Stages
//!
//! - [`scanner`] - Splits a reply into clean text and checkout identifiers
//! - [`resolver`] - Looks identifiers up concurrently, keeping input order
//! - [`pipeline`] - Orchestrates one invocation as a notification stream
//!
//! ## Example
//!
//! ```ignore
//! use cartbot_assistant::ChatAssistant;
//! use cartbot_fetch::{BackendClient, BackendSettings};
//!
//! let client = BackendClient::new(&BackendSettings::default())?;
//! let assistant = ChatAssistant::with_backend(client);
//!
//! match assistant.process_message("I need a kettle").terminal().await {
//!     Some(Ok(outcome)) => println!("{}", outcome.display_text),
//!     Some(Err(message)) => eprintln!("{message}"),
//!     None => {}
//! }
//! ```

pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod settings;

pub use error::{AssistantError, GENERIC_FAILURE_MESSAGE};
pub use pipeline::{ChatAssistant, OutcomeStream};
pub use resolver::{lookup_one, resolve_recommendations, LookupOutcome};
pub use scanner::{
    extract_block, parse_identifiers, scan_response, strip_blocks, CheckoutPayload,
    ScannedResponse, CHECKOUT_CLOSE_TAG, CHECKOUT_OPEN_TAG, DEFAULT_FALLBACK_GREETING,
};
pub use settings::AssistantSettings;
