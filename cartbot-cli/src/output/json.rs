//! JSON output formatting.

use anyhow::Result;
use cartbot_assistant::{CheckoutPayload, ScannedResponse};
use cartbot_core::ProductSummary;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for `cartbot scan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutput<'a> {
    pub display_text: &'a str,
    pub checkout: &'static str,
    pub identifiers: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<&'a [ProductSummary]>,
}

impl<'a> ScanOutput<'a> {
    pub fn new(scanned: &'a ScannedResponse, resolved: Option<&'a [ProductSummary]>) -> Self {
        let checkout = match scanned.payload {
            CheckoutPayload::Absent => "absent",
            CheckoutPayload::Parsed(_) => "parsed",
            CheckoutPayload::Malformed => "malformed",
        };

        Self {
            display_text: &scanned.clean_text,
            checkout,
            identifiers: scanned.payload.identifiers(),
            recommendations: resolved,
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a scan result.
    pub fn format_scan(
        &self,
        scanned: &ScannedResponse,
        resolved: Option<&[ProductSummary]>,
    ) -> Result<String> {
        self.format(&ScanOutput::new(scanned, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert!(!output.contains('\n'));
    }
}
