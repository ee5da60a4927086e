//! Assistant settings.

use std::time::Duration;

use crate::scanner::DEFAULT_FALLBACK_GREETING;

/// Tuning for the chat-to-checkout pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Text shown when a reply has no readable content.
    pub fallback_greeting: String,
    /// Upper bound for each product lookup. `None` waits indefinitely.
    pub lookup_timeout: Option<Duration>,
    /// Capacity of the notification channel (at least 2).
    pub channel_capacity: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            fallback_greeting: DEFAULT_FALLBACK_GREETING.to_string(),
            lookup_timeout: Some(Duration::from_secs(15)),
            channel_capacity: 4,
        }
    }
}

impl AssistantSettings {
    /// Sets the fallback greeting.
    pub fn with_fallback_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.fallback_greeting = greeting.into();
        self
    }

    /// Sets the per-lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}
