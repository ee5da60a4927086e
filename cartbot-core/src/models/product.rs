//! Product types.

use serde::{Deserialize, Serialize};

/// A product as presented in a recommendation list.
///
/// Fetched from the catalog backend and never modified by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Opaque product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price in the product's currency.
    pub price: f64,
    /// ISO 4217 currency code, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the product can currently be ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl ProductSummary {
    /// Creates a product with the required fields only.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            currency: None,
            image_url: None,
            description: None,
            in_stock: None,
        }
    }

    /// Sets the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Formats the price with its currency, e.g. `"19.99 USD"`.
    pub fn display_price(&self) -> String {
        match &self.currency {
            Some(currency) => format!("{:.2} {}", self.price, currency),
            None => format!("{:.2}", self.price),
        }
    }

    /// Returns false only when the backend explicitly reports the item as out of stock.
    pub fn is_orderable(&self) -> bool {
        self.in_stock != Some(false)
    }
}
