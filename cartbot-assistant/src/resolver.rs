//! Recommendation resolver.
//!
//! Resolves product identifiers against a [`ProductCatalog`]. All lookups
//! run concurrently and the resolver waits for every one of them. Results
//! land in per-position slots, so the output follows input order no matter
//! which lookup finishes first. Failed and missing products are dropped.

use std::time::Duration;

use cartbot_core::{first_terminal, ProductCatalog, ProductSummary};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Lookup Outcome
// ============================================================================

/// Result of resolving a single identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The catalog returned the product.
    Found(ProductSummary),
    /// The catalog stream ended without a terminal notification.
    NotFound,
    /// The catalog reported an error, or the lookup timed out.
    Failed(String),
}

impl LookupOutcome {
    /// Returns the product, if found.
    pub fn into_product(self) -> Option<ProductSummary> {
        match self {
            Self::Found(product) => Some(product),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Looks up one identifier, waiting at most `timeout` when set.
pub async fn lookup_one<C>(catalog: &C, id: &str, timeout: Option<Duration>) -> LookupOutcome
where
    C: ProductCatalog + ?Sized,
{
    let stream = catalog.product_detail(id);

    let terminal = match timeout {
        Some(limit) => match tokio::time::timeout(limit, first_terminal(stream)).await {
            Ok(terminal) => terminal,
            Err(_) => return LookupOutcome::Failed(format!("Lookup timed out after {limit:?}")),
        },
        None => first_terminal(stream).await,
    };

    match terminal {
        Some(Ok(product)) => LookupOutcome::Found(product),
        Some(Err(message)) => LookupOutcome::Failed(message),
        None => LookupOutcome::NotFound,
    }
}

/// Resolves `ids` concurrently and returns the found products in input order.
///
/// Returns immediately, without touching the catalog, when `ids` is empty.
#[instrument(skip(catalog, ids), fields(requested = ids.len()))]
pub async fn resolve_recommendations<C>(
    catalog: &C,
    ids: &[String],
    timeout: Option<Duration>,
) -> Vec<ProductSummary>
where
    C: ProductCatalog + ?Sized,
{
    if ids.is_empty() {
        return Vec::new();
    }

    let lookups = ids.iter().map(|id| async move {
        let outcome = lookup_one(catalog, id, timeout).await;
        match &outcome {
            LookupOutcome::Found(_) => debug!(id = %id, "Product resolved"),
            LookupOutcome::NotFound => debug!(id = %id, "Product not found, dropping"),
            LookupOutcome::Failed(error) => {
                warn!(id = %id, error = %error, "Product lookup failed, dropping");
            }
        }
        outcome.into_product()
    });

    // One slot per input position
    let slots: Vec<Option<ProductSummary>> = join_all(lookups).await;
    let products: Vec<ProductSummary> = slots.into_iter().flatten().collect();

    info!(
        requested = ids.len(),
        resolved = products.len(),
        "Recommendations resolved"
    );

    products
}

// ============================================================================
// Tests
// ============================================================================
