// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Cartbot Store
//!
//! Local state for the Cartbot client.
//!
//! This crate provides:
//!
//! - **Config**: JSON configuration file, converted into runtime settings
//! - **ChatSession**: Bounded transcript for interactive chats
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use cartbot_store::Config;
//!
//! let config = Config::load().await?;
//! let backend = config.backend_settings();
//! let assistant = config.assistant_settings();
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod session;

pub use config::{AssistantConfig, BackendConfig, Config, GeneralConfig, DEFAULT_API_TOKEN_ENV};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, load_json, load_json_or_default, save_json,
    CONFIG_FILE_NAME,
};
pub use session::{ChatRole, ChatSession, ChatTurn, DEFAULT_MAX_TURNS};

#[cfg(test)]
mod persistence_tests;
