//! Chat types.

use serde::{Deserialize, Serialize};

use super::product::ProductSummary;

/// The result of processing one assistant response.
///
/// Built fresh for every inbound response. `recommendations` holds at most
/// one entry per requested identifier, in the order the identifiers
/// appeared in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Assistant text with the embedded checkout block removed.
    pub display_text: String,
    /// Products that resolved successfully.
    #[serde(default)]
    pub recommendations: Vec<ProductSummary>,
}

impl ChatOutcome {
    /// Creates an outcome with text and recommendations.
    pub fn new(display_text: impl Into<String>, recommendations: Vec<ProductSummary>) -> Self {
        Self {
            display_text: display_text.into(),
            recommendations,
        }
    }

    /// Creates an outcome with no recommendations.
    pub fn text_only(display_text: impl Into<String>) -> Self {
        Self::new(display_text, Vec::new())
    }

    /// Returns true if any product resolved.
    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }

    /// Sum of the recommended products' prices.
    pub fn total_price(&self) -> f64 {
        self.recommendations.iter().map(|p| p.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only() {
        let outcome = ChatOutcome::text_only("hi");
        assert_eq!(outcome.display_text, "hi");
        assert!(!outcome.has_recommendations());
        assert!(outcome.total_price().abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_price() {
        let outcome = ChatOutcome::new(
            "picks",
            vec![
                ProductSummary::new("a", "A", 2.5),
                ProductSummary::new("b", "B", 1.5),
            ],
        );
        assert!((outcome.total_price() - 4.0).abs() < f64::EPSILON);
    }
}
