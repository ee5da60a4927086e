//! Chat-to-checkout pipeline.
//!
//! One invocation of [`ChatAssistant::process_message`] walks through:
//!
//! 1. emit `Loading`
//! 2. await the chat backend's reply (its own `Loading` notifications are
//!    swallowed; its `Error` ends the pipeline)
//! 3. scan the reply for a checkout block
//! 4. resolve any identifiers concurrently
//! 5. emit exactly one terminal notification, then close
//!
//! Panics during steps 3 and 4 are caught and reported as a terminal error.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use cartbot_core::{ChatOutcome, ChatTransport, ProductCatalog, Resource};
use cartbot_fetch::BackendClient;
use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::AssistantError;
use crate::resolver::resolve_recommendations;
use crate::scanner::scan_response;
use crate::settings::AssistantSettings;

// ============================================================================
// Chat Assistant
// ============================================================================

/// Turns chat messages into [`ChatOutcome`]s.
///
/// Holds no per-invocation state; processing the same reply twice against
/// the same catalog answers yields equal outcomes.
#[derive(Clone)]
pub struct ChatAssistant {
    transport: Arc<dyn ChatTransport>,
    catalog: Arc<dyn ProductCatalog>,
    settings: AssistantSettings,
}

impl ChatAssistant {
    /// Creates an assistant over the given collaborators.
    pub fn new(transport: Arc<dyn ChatTransport>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            transport,
            catalog,
            settings: AssistantSettings::default(),
        }
    }

    /// Creates an assistant that uses one backend client for both chat and catalog.
    pub fn with_backend(client: BackendClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: AssistantSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the settings in use.
    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// Sends `text` to the chat backend and streams the processed outcome.
    ///
    /// The stream yields `Loading`, then exactly one of `Success(outcome)` or
    /// `Error(message)`, then ends. Dropping the stream cancels the
    /// invocation, including any product lookups still in flight.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn process_message(&self, text: impl Into<String>) -> OutcomeStream {
        let capacity = self.settings.channel_capacity.max(2);
        let (tx, rx) = mpsc::channel(capacity);
        let assistant = self.clone();
        let text = text.into();

        let task = tokio::spawn(async move {
            if tx.send(Resource::Loading).await.is_err() {
                debug!("Consumer gone before start");
                return;
            }

            let terminal = assistant.run(&text).await;
            if tx.send(terminal).await.is_err() {
                debug!("Consumer gone before completion");
            }
        });

        OutcomeStream { rx, task }
    }

    /// Scans an already-received reply and resolves its recommendations.
    pub async fn process_response(&self, raw: &str) -> ChatOutcome {
        let scanned = scan_response(raw, &self.settings.fallback_greeting);
        let recommendations = resolve_recommendations(
            self.catalog.as_ref(),
            scanned.payload.identifiers(),
            self.settings.lookup_timeout,
        )
        .await;

        ChatOutcome::new(scanned.clean_text, recommendations)
    }

    /// Runs one invocation to its terminal notification.
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn run(&self, text: &str) -> Resource<ChatOutcome> {
        let result = AssertUnwindSafe(self.try_run(text)).catch_unwind().await;

        let result = result.unwrap_or_else(|panic| {
            Err(AssistantError::Unexpected(panic_message(panic.as_ref())))
        });

        match result {
            Ok(outcome) => {
                info!(
                    recommendations = outcome.recommendations.len(),
                    "Chat outcome ready"
                );
                Resource::Success(outcome)
            }
            Err(e @ AssistantError::Upstream(_)) => {
                warn!(error = %e, "Chat backend failed");
                Resource::Error(e.user_message())
            }
            Err(e) => {
                error!(error = %e, "Chat pipeline failed");
                Resource::Error(e.user_message())
            }
        }
    }

    async fn try_run(&self, text: &str) -> Result<ChatOutcome, AssistantError> {
        let raw = self.await_reply(text).await?;
        debug!(reply_len = raw.len(), "Processing assistant reply");
        Ok(self.process_response(&raw).await)
    }

    /// Waits for the chat backend's first terminal notification.
    async fn await_reply(&self, text: &str) -> Result<String, AssistantError> {
        let mut upstream = self.transport.send_message(text);

        while let Some(notification) = upstream.next().await {
            match notification {
                Resource::Loading => {}
                Resource::Success(raw) => return Ok(raw),
                Resource::Error(message) => return Err(AssistantError::Upstream(message)),
            }
        }

        Err(AssistantError::UpstreamClosed)
    }
}

impl std::fmt::Debug for ChatAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAssistant")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

// ============================================================================
// Outcome Stream
// ============================================================================

/// Notification stream for one [`ChatAssistant::process_message`] call.
///
/// Dropping it aborts the background task.
#[derive(Debug)]
pub struct OutcomeStream {
    rx: mpsc::Receiver<Resource<ChatOutcome>>,
    task: JoinHandle<()>,
}

impl OutcomeStream {
    /// Waits for the terminal notification, skipping `Loading`.
    ///
    /// Returns `None` if the invocation was aborted before finishing.
    pub async fn terminal(mut self) -> Option<Result<ChatOutcome, String>> {
        while let Some(notification) = self.next().await {
            if let Some(result) = notification.into_result() {
                return Some(result);
            }
        }
        None
    }

    /// Cancels the invocation.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Stream for OutcomeStream {
    type Item = Resource<ChatOutcome>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for OutcomeStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}
