//! Integration tests for core chat and product types.

use cartbot_core::{ChatOutcome, ProductSummary, Resource};

#[test]
fn test_outcome_deserializes_without_recommendations() {
    let outcome: ChatOutcome = serde_json::from_str(r#"{"display_text":"hello"}"#).unwrap();
    assert_eq!(outcome, ChatOutcome::text_only("hello"));
}

#[test]
fn test_outcome_equality_is_structural() {
    let a = ChatOutcome::new("x", vec![ProductSummary::new("p1", "One", 1.0)]);
    let b = ChatOutcome::new("x", vec![ProductSummary::new("p1", "One", 1.0)]);
    assert_eq!(a, b);
}

#[test]
fn test_resource_of_outcome_serializes_with_status_tag() {
    let notification = Resource::Success(ChatOutcome::text_only("hi"));
    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["display_text"], "hi");
}
