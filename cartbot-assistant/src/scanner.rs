//! Response text scanner.
//!
//! Assistant replies may embed a machine-readable checkout block:
//!
//! ```text
//! Here are some picks! <checkout>[{"id":"p1"},{"id":"p2"}]</checkout>
//! ```
//!
//! The scanner splits a reply into the human-readable text (every block
//! removed, whitespace trimmed) and the product identifiers listed in the
//! first block. Only the string-valued `id` of each array element is read;
//! other element fields are display hints and are ignored here.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Opening tag of the embedded checkout block.
pub const CHECKOUT_OPEN_TAG: &str = "<checkout>";

/// Closing tag of the embedded checkout block.
pub const CHECKOUT_CLOSE_TAG: &str = "</checkout>";

/// Text shown when the assistant's reply has nothing readable in it.
pub const DEFAULT_FALLBACK_GREETING: &str =
    "Hi! I'm your shopping assistant. How can I help you today?";

// ============================================================================
// Regex Patterns
// ============================================================================

/// Checkout block, non-greedy, spanning newlines.
static CHECKOUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<checkout>(.*?)</checkout>").expect("Invalid regex")
});

// ============================================================================
// Types
// ============================================================================

/// What the scanner found in the checkout slot of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPayload {
    /// No checkout block in the reply.
    Absent,
    /// A block was present and parsed; may still hold zero identifiers.
    Parsed(Vec<String>),
    /// A block was present but was not a JSON array. Recovered as no identifiers.
    Malformed,
}

impl CheckoutPayload {
    /// Identifiers to resolve, in display order.
    pub fn identifiers(&self) -> &[String] {
        match self {
            Self::Parsed(ids) => ids,
            Self::Absent | Self::Malformed => &[],
        }
    }

    /// Returns true if a block was present but unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// A reply split into display text and checkout payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedResponse {
    /// Reply with every checkout block removed and whitespace trimmed.
    pub clean_text: String,
    /// Parsed contents of the first checkout block.
    pub payload: CheckoutPayload,
}

// ============================================================================
// Scanning
// ============================================================================

/// Scans an assistant reply.
///
/// When nothing readable remains after stripping checkout blocks (including
/// empty or whitespace-only input), `clean_text` is `fallback_greeting`.
pub fn scan_response(raw: &str, fallback_greeting: &str) -> ScannedResponse {
    let clean_text = strip_blocks(raw);
    let clean_text = if clean_text.is_empty() {
        fallback_greeting.to_string()
    } else {
        clean_text
    };

    let payload = match extract_block(raw) {
        None => CheckoutPayload::Absent,
        Some(block) => parse_identifiers(block),
    };

    debug!(
        text_len = clean_text.len(),
        identifiers = payload.identifiers().len(),
        malformed = payload.is_malformed(),
        "Scanned assistant reply"
    );

    ScannedResponse { clean_text, payload }
}

/// Returns the contents of the first checkout block, if any.
pub fn extract_block(raw: &str) -> Option<&str> {
    CHECKOUT_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Removes every checkout block and trims the result.
pub fn strip_blocks(raw: &str) -> String {
    CHECKOUT_RE.replace_all(raw, "").trim().to_string()
}

/// Parses a checkout block into product identifiers.
///
/// The block must be a JSON array. Elements without a non-empty string
/// `id` are skipped; repeated identifiers keep their first position.
pub fn parse_identifiers(block: &str) -> CheckoutPayload {
    let value: Value = match serde_json::from_str(block.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Checkout block is not valid JSON, ignoring it");
            return CheckoutPayload::Malformed;
        }
    };

    let Value::Array(items) = value else {
        warn!("Checkout block is not a JSON array, ignoring it");
        return CheckoutPayload::Malformed;
    };

    let mut seen = HashSet::new();
    let ids: Vec<String> = items
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_str))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect();

    if ids.len() < items.len() {
        debug!(
            elements = items.len(),
            identifiers = ids.len(),
            "Skipped checkout elements without a usable id"
        );
    }

    CheckoutPayload::Parsed(ids)
}

// ============================================================================
// Tests
// ============================================================================
