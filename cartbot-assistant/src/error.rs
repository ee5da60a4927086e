//! Assistant error types.

use thiserror::Error;

/// Message shown when processing fails for a reason the user can't act on.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, something went wrong while preparing your recommendations. Please try again.";

/// Errors that end a pipeline invocation.
///
/// Malformed checkout blocks and individual lookup failures are recovered
/// inside the pipeline and never show up here.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The chat backend reported an error; the message is passed on verbatim.
    #[error("{0}")]
    Upstream(String),

    /// The chat backend's stream ended without a reply.
    #[error("Chat backend closed without a reply")]
    UpstreamClosed,

    /// Anything else that went wrong during extraction or resolution.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl AssistantError {
    /// The text delivered to the consumer in the terminal error notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream(message) => message.clone(),
            Self::UpstreamClosed | Self::Unexpected(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
