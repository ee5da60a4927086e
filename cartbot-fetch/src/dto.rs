//! Backend wire types and their mapping to domain models.

use cartbot_core::ProductSummary;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FetchError;

// ============================================================================
// Chat
// ============================================================================

/// Body of a chat request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// The user's message.
    pub message: &'a str,
}

/// Body of a chat reply.
#[derive(Debug, Deserialize)]
pub struct ChatReplyDto {
    /// The assistant's raw reply text.
    #[serde(alias = "response", alias = "message", alias = "text")]
    pub reply: String,
}

/// Extracts the raw assistant text from a chat reply body.
///
/// JSON bodies must carry a reply field; anything else is taken as the
/// reply text itself.
pub fn parse_chat_reply(body: &str) -> Result<String, FetchError> {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('{') {
        debug!(len = body.len(), "Chat reply is plain text");
        return Ok(body.to_string());
    }

    let dto: ChatReplyDto = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to parse chat reply JSON");
        FetchError::InvalidResponse(format!("Invalid chat reply: {e}"))
    })?;

    Ok(dto.reply)
}

// ============================================================================
// Product
// ============================================================================

/// Product record as returned by the catalog endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductDto {
    /// Product identifier.
    pub id: String,
    /// Display name.
    #[serde(alias = "title")]
    pub name: String,
    /// Price as a number or a numeric string.
    #[serde(alias = "unit_price", alias = "unitPrice")]
    pub price: PriceValue,
    /// Currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Image URL.
    #[serde(default, alias = "image", alias = "imageUrl", alias = "thumbnail")]
    pub image_url: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Stock flag.
    #[serde(default, alias = "inStock", alias = "available")]
    pub in_stock: Option<bool>,
}

/// Prices arrive either as JSON numbers or as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    /// `19.99`
    Number(f64),
    /// `"19.99"`
    Text(String),
}

impl PriceValue {
    fn to_f64(&self) -> Result<f64, FetchError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| FetchError::InvalidResponse(format!("Invalid price: {s}"))),
        }
    }
}

/// Some deployments wrap records in a `{"data": ...}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductEnvelope {
    Wrapped { data: ProductDto },
    Bare(ProductDto),
}

impl TryFrom<ProductDto> for ProductSummary {
    type Error = FetchError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        let price = dto.price.to_f64()?;
        Ok(ProductSummary {
            id: dto.id,
            name: dto.name,
            price,
            currency: dto.currency,
            image_url: dto.image_url,
            description: dto.description,
            in_stock: dto.in_stock,
        })
    }
}

/// Parses a product detail body into a [`ProductSummary`].
pub fn parse_product(body: &str) -> Result<ProductSummary, FetchError> {
    let envelope: ProductEnvelope = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to parse product JSON");
        FetchError::InvalidResponse(format!("Invalid product: {e}"))
    })?;

    let dto = match envelope {
        ProductEnvelope::Wrapped { data } => data,
        ProductEnvelope::Bare(dto) => dto,
    };

    ProductSummary::try_from(dto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_json_aliases() {
        assert_eq!(parse_chat_reply(r#"{"reply":"hi"}"#).unwrap(), "hi");
        assert_eq!(parse_chat_reply(r#"{"response":"hey"}"#).unwrap(), "hey");
        assert_eq!(parse_chat_reply(r#"{"message":"yo"}"#).unwrap(), "yo");
    }

    #[test]
    fn test_chat_reply_plain_text_passthrough() {
        let raw = "Here you go <checkout>[{\"id\":\"p1\"}]</checkout>";
        assert_eq!(parse_chat_reply(raw).unwrap(), raw);
    }

    #[test]
    fn test_chat_reply_json_without_reply_field() {
        let err = parse_chat_reply(r#"{"other":1}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_bare_product() {
        let product = parse_product(
            r#"{"id":"p1","title":"Kettle","price":"24.50",
                "imageUrl":"https://img/k.png","inStock":true}"#,
        )
        .unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.name, "Kettle");
        assert!((product.price - 24.5).abs() < f64::EPSILON);
        assert_eq!(product.image_url.as_deref(), Some("https://img/k.png"));
        assert_eq!(product.in_stock, Some(true));
    }

    #[test]
    fn test_parse_wrapped_product() {
        let product =
            parse_product(r#"{"data":{"id":"p2","name":"Cup","price":3,"currency":"USD"}}"#)
                .unwrap();
        assert_eq!(product.id, "p2");
        assert_eq!(product.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_parse_product_bad_price() {
        let err = parse_product(r#"{"id":"p3","name":"Cup","price":"cheap"}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(msg) if msg.contains("cheap")));
    }

    #[test]
    fn test_parse_product_missing_fields() {
        assert!(parse_product(r#"{"id":"p4"}"#).is_err());
        assert!(parse_product("not json").is_err());
    }
}
