//! REST client for the commerce backend.
//!
//! [`BackendClient`] implements both collaborator traits from
//! `cartbot-core`:
//!
//! - [`ChatTransport`]: `POST {base}/chat` with `{"message": "..."}`
//! - [`ProductCatalog`]: `GET {base}/products/{id}`
//!
//! Each call is exposed as a notification stream that emits `Loading`
//! followed by exactly one terminal notification. The one exception is a
//! product lookup answered with 404, whose stream ends right after `Loading`.

use std::sync::Arc;

use cartbot_core::{ChatTransport, ProductCatalog, ProductSummary, Resource, ResourceStream};
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::{Response, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::dto::{parse_chat_reply, parse_product, ChatRequest};
use crate::error::FetchError;
use crate::host::http::{HttpClient, ResponseExt};
use crate::settings::BackendSettings;

// ============================================================================
// Backend Client
// ============================================================================

/// HTTP-backed chat transport and product catalog.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: Arc<HttpClient>,
    base_url: Url,
    api_token: Option<String>,
}

impl BackendClient {
    /// Creates a client from settings.
    pub fn new(settings: &BackendSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(settings.base_url.clone()));
        }

        let mut http = HttpClient::with_timeout(settings.timeout)?
            .with_retry_strategy(settings.retry.clone());
        if let Some(domains) = &settings.allowed_domains {
            http = http.with_allowed_domains(domains.clone());
        }

        info!(base_url = %base_url, "Backend client configured");

        Ok(Self {
            http: Arc::new(http),
            base_url,
            api_token: settings.api_token.clone(),
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL by appending percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a chat message and returns the assistant's raw reply text.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn post_chat(&self, text: &str) -> Result<String, FetchError> {
        let url = self.endpoint(&["chat"])?;
        let body = ChatRequest { message: text };

        let response = self
            .http
            .post_json(url.as_str(), &body, self.api_token.as_deref())
            .await?;
        let response = check_status(response, "chat")?;

        let body = response.text().await?;
        let reply = parse_chat_reply(&body)?;
        debug!(reply_len = reply.len(), "Chat reply received");
        Ok(reply)
    }

    /// Fetches a single product by identifier.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &str) -> Result<ProductSummary, FetchError> {
        let url = self.endpoint(&["products", id])?;

        let response = self.http.get(url.as_str(), self.api_token.as_deref()).await?;
        let response = check_status(response, &format!("product {id}"))?;

        let body = response.text().await?;
        parse_product(&body)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.api_token.is_some())
            .finish_non_exhaustive()
    }
}

impl ChatTransport for BackendClient {
    fn send_message(&self, text: &str) -> ResourceStream<String> {
        let client = self.clone();
        let text = text.to_string();

        stream::once(future::ready(Resource::Loading))
            .chain(stream::once(async move {
                Resource::from(client.post_chat(&text).await)
            }))
            .boxed()
    }
}

impl ProductCatalog for BackendClient {
    fn product_detail(&self, id: &str) -> ResourceStream<ProductSummary> {
        let client = self.clone();
        let id = id.to_string();

        // A 404 ends the stream without a terminal notification
        stream::once(future::ready(Some(Resource::Loading)))
            .chain(stream::once(async move {
                match client.get_product(&id).await {
                    Err(FetchError::NotFound(what)) => {
                        debug!(what = %what, "Product not found, ending stream");
                        None
                    }
                    result => Some(Resource::from(result)),
                }
            }))
            .filter_map(future::ready)
            .boxed()
    }
}

// ============================================================================
// Status Handling
// ============================================================================

/// Maps a non-success response to an error; passes success through.
fn check_status(response: Response, what: &str) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response.retry_after_secs();
    let error = status_error(status, retry_after, what);
    warn!(status = %status, error = %error, "Backend returned an error status");
    Err(error)
}

/// Translates an HTTP error status into a [`FetchError`].
pub fn status_error(status: StatusCode, retry_after: Option<u64>, what: &str) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound(what.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::AuthenticationFailed("Invalid or expired credentials".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FetchError::Timeout,
        _ => FetchError::InvalidResponse(format!("Unexpected status code: {status}")),
    }
}

// ============================================================================
// Tests
// ============================================================================
