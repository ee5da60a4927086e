//! Text output formatting with colors.

use cartbot_assistant::{CheckoutPayload, ScannedResponse};
use cartbot_core::{ChatOutcome, ProductSummary};
use cartbot_store::{ChatRole, ChatTurn};
use chrono::Local;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Line shown while the assistant is working.
    pub fn format_loading(&self) -> String {
        self.dim("Thinking...")
    }

    /// Formats an assistant outcome: text, then the recommendation list.
    pub fn format_outcome(&self, outcome: &ChatOutcome) -> String {
        let mut lines = vec![outcome.display_text.clone()];

        if outcome.has_recommendations() {
            lines.push(String::new());
            lines.push(self.bold(&format!(
                "Recommended ({}):",
                outcome.recommendations.len()
            )));
            for (i, product) in outcome.recommendations.iter().enumerate() {
                lines.push(self.format_product_line(i + 1, product));
            }
            lines.push(format!(
                "Total: {}",
                self.green(&format_total(&outcome.recommendations))
            ));
        }

        lines.join("\n")
    }

    /// One numbered product line, e.g. `"  1. Kettle  24.50 USD  [p1]"`.
    pub fn format_product_line(&self, index: usize, product: &ProductSummary) -> String {
        let mut line = format!(
            "{:>3}. {}  {}  {}",
            index,
            product.name,
            self.green(&product.display_price()),
            self.dim(&format!("[{}]", product.id))
        );
        if !product.is_orderable() {
            line.push_str(&format!("  {}", self.red("out of stock")));
        }
        line
    }

    /// Formats full product details.
    pub fn format_product(&self, product: &ProductSummary) -> String {
        let mut lines = vec![
            self.bold(&product.name),
            format!("ID:     {}", product.id),
            format!("Price:  {}", self.green(&product.display_price())),
        ];

        let stock = match product.in_stock {
            Some(true) => self.green("in stock"),
            Some(false) => self.red("out of stock"),
            None => self.dim("unknown"),
        };
        lines.push(format!("Stock:  {stock}"));

        if let Some(image) = &product.image_url {
            lines.push(format!("Image:  {}", self.cyan(image)));
        }
        if let Some(description) = &product.description {
            lines.push(String::new());
            lines.push(description.clone());
        }

        lines.join("\n")
    }

    /// Formats a scan result, with resolved products when available.
    pub fn format_scan(
        &self,
        scanned: &ScannedResponse,
        resolved: Option<&[ProductSummary]>,
    ) -> String {
        let mut lines = vec![scanned.clean_text.clone(), String::new()];

        match &scanned.payload {
            CheckoutPayload::Absent => lines.push(self.dim("No checkout block")),
            CheckoutPayload::Malformed => {
                lines.push(self.yellow("Checkout block is malformed, no products"));
            }
            CheckoutPayload::Parsed(ids) if ids.is_empty() => {
                lines.push(self.dim("Checkout block lists no products"));
            }
            CheckoutPayload::Parsed(ids) => {
                lines.push(format!("Identifiers: {}", ids.join(", ")));
            }
        }

        if let Some(products) = resolved {
            lines.push(format!(
                "Resolved {} of {}",
                products.len(),
                scanned.payload.identifiers().len()
            ));
            for (i, product) in products.iter().enumerate() {
                lines.push(self.format_product_line(i + 1, product));
            }
        }

        lines.join("\n")
    }

    /// Formats one transcript turn with its local time.
    pub fn format_turn(&self, turn: &ChatTurn) -> String {
        let time = turn.at.with_timezone(&Local).format("%H:%M");
        let speaker = match turn.role {
            ChatRole::User => self.cyan("you"),
            ChatRole::Assistant if turn.is_error => self.red("cartbot"),
            ChatRole::Assistant => self.bold("cartbot"),
        };

        let mut line = format!("{} {}: {}", self.dim(&time.to_string()), speaker, turn.text);
        if !turn.recommendations.is_empty() {
            line.push_str(&self.dim(&format!(
                " ({} recommendations)",
                turn.recommendations.len()
            )));
        }
        line
    }

    /// Formats an error message.
    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.red("✗"), message)
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Sum of prices, with the currency when every product shares one.
fn format_total(products: &[ProductSummary]) -> String {
    let total: f64 = products.iter().map(|p| p.price).sum();
    let first = products.first().and_then(|p| p.currency.as_deref());

    match first {
        Some(currency) if products.iter().all(|p| p.currency.as_deref() == Some(currency)) => {
            format!("{total:.2} {currency}")
        }
        _ => format!("{total:.2}"),
    }
}
