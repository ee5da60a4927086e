//! Notification types.
//!
//! Every backend call and every assistant invocation reports progress as a
//! stream of [`Resource`] notifications: an optional `Loading`, followed by
//! at most one terminal `Success` or `Error`.

use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

/// Boxed, sendable stream of notifications.
pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

// ============================================================================
// Resource
// ============================================================================

/// A single notification on a request stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Resource<T> {
    /// The request is in flight.
    Loading,
    /// The request completed with a value.
    Success(T),
    /// The request failed with a human-readable message.
    Error(String),
}

impl<T> Resource<T> {
    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Returns true for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Returns true for `Loading`.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the success value, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Maps the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Self::Loading => Resource::Loading,
            Self::Success(value) => Resource::Success(f(value)),
            Self::Error(message) => Resource::Error(message),
        }
    }

    /// Converts a terminal notification into a `Result`.
    ///
    /// Returns `None` for `Loading`.
    pub fn into_result(self) -> Option<Result<T, String>> {
        match self {
            Self::Loading => None,
            Self::Success(value) => Some(Ok(value)),
            Self::Error(message) => Some(Err(message)),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Resource<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

// ============================================================================
// Stream Helpers
// ============================================================================

/// Drains a notification stream up to its first terminal notification.
///
/// `Loading` notifications are skipped. Returns `None` if the stream ends
/// without ever reaching a terminal notification.
pub async fn first_terminal<T>(mut stream: ResourceStream<T>) -> Option<Result<T, String>> {
    while let Some(notification) = stream.next().await {
        if let Some(result) = notification.into_result() {
            return Some(result);
        }
    }
    None
}
