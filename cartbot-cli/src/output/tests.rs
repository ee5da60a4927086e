//! CLI output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use cartbot_assistant::scan_response;
    use cartbot_core::{ChatOutcome, ProductSummary};
    use cartbot_store::ChatSession;

    fn kettle() -> ProductSummary {
        ProductSummary::new("p1", "Kettle", 24.5).with_currency("USD")
    }

    #[test]
    fn test_text_only_outcome_is_just_text() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_outcome(&ChatOutcome::text_only("Hello!"));
        assert_eq!(output, "Hello!");
    }

    #[test]
    fn test_outcome_lists_products_in_order() {
        let formatter = TextFormatter::new(false);
        let mug = ProductSummary::new("p2", "Mug", 5.5).with_currency("USD");
        let output = formatter.format_outcome(&ChatOutcome::new("Picks:", vec![kettle(), mug]));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Picks:");
        assert_eq!(lines[2], "Recommended (2):");
        assert_eq!(lines[3], "  1. Kettle  24.50 USD  [p1]");
        assert_eq!(lines[4], "  2. Mug  5.50 USD  [p2]");
        assert_eq!(lines[5], "Total: 30.00 USD");
    }

    #[test]
    fn test_mixed_currency_total_has_no_code() {
        let formatter = TextFormatter::new(false);
        let other = ProductSummary::new("p9", "Scarf", 10.0).with_currency("EUR");
        let output = formatter.format_outcome(&ChatOutcome::new("x", vec![kettle(), other]));
        assert!(output.ends_with("Total: 34.50"));
    }

    #[test]
    fn test_out_of_stock_is_flagged() {
        let formatter = TextFormatter::new(false);
        let mut product = kettle();
        product.in_stock = Some(false);
        assert!(formatter.format_product_line(1, &product).ends_with("out of stock"));
        assert!(formatter.format_product(&product).contains("Stock:  out of stock"));
    }

    #[test]
    fn test_colors_toggle() {
        let plain = TextFormatter::new(false).format_error("boom");
        let colored = TextFormatter::new(true).format_error("boom");
        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[31m"));
    }

    #[test]
    fn test_scan_malformed_and_parsed() {
        let formatter = TextFormatter::new(false);

        let malformed = scan_response("Hi <checkout>{</checkout>", "greeting");
        assert!(formatter.format_scan(&malformed, None).contains("malformed"));

        let parsed = scan_response(
            r#"Hi <checkout>[{"id":"p1"},{"id":"p2"}]</checkout>"#,
            "greeting",
        );
        let output = formatter.format_scan(&parsed, Some(&[kettle()]));
        assert!(output.contains("Identifiers: p1, p2"));
        assert!(output.contains("Resolved 1 of 2"));
    }

    #[test]
    fn test_turn_shows_speaker() {
        let formatter = TextFormatter::new(false);
        let mut session = ChatSession::default();
        session.record_user("kettles?");
        session.record_error("Chat service unavailable");

        let lines: Vec<String> = session.turns().map(|t| formatter.format_turn(t)).collect();
        assert!(lines[0].ends_with("you: kettles?"));
        assert!(lines[1].ends_with("cartbot: Chat service unavailable"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use cartbot_assistant::scan_response;
    use cartbot_core::{ChatOutcome, ProductSummary, Resource};

    #[test]
    fn test_scan_output_shape() {
        let scanned = scan_response(r#"Hi <checkout>[{"id":"p1"}]</checkout>"#, "greeting");
        let output = JsonFormatter::new(false).format_scan(&scanned, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["displayText"], "Hi");
        assert_eq!(value["checkout"], "parsed");
        assert_eq!(value["identifiers"], serde_json::json!(["p1"]));
        assert!(value.get("recommendations").is_none());
    }

    #[test]
    fn test_terminal_notification_shape() {
        let formatter = JsonFormatter::new(false);

        let success = Resource::Success(ChatOutcome::new(
            "Picks",
            vec![ProductSummary::new("p1", "Mug", 3.0)],
        ));
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format(&success).unwrap()).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["recommendations"][0]["id"], "p1");

        let error: Resource<ChatOutcome> = Resource::error("down");
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format(&error).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"status": "error", "data": "down"}));
    }
}
