//! Persistence and config file tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::Config;
use crate::error::StoreError;
use crate::persistence::{load_json, load_json_or_default, save_json};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});
    save_json(&nested_path, &data).await.unwrap();

    let loaded: serde_json::Value = load_json(&nested_path).await.unwrap();
    assert_eq!(loaded, data);
}

#[tokio::test]
async fn test_load_nonexistent_file_is_not_found() {
    let file_path = PathBuf::from("/nonexistent/path/config.json");

    let err = load_json::<Config>(&file_path).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_load_corrupt_file_falls_back_to_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let config: Config = load_json_or_default(&path).await;
    assert_eq!(config, Config::default());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[tokio::test]
async fn test_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json"))
        .await
        .unwrap();
    assert_eq!(config, Config::default());
}

#[tokio::test]
async fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cartbot").join("config.json");

    let mut config = Config::default();
    config.backend.base_url = "https://shop.example.com/api".to_string();
    config.backend.allowed_domains = vec!["shop.example.com".to_string()];
    config.assistant.fallback_greeting = Some("Hello!".to_string());
    config.general.history_limit = 10;

    config.save_to(&path).await.unwrap();
    let loaded = Config::load_from(&path).await.unwrap();
    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    tokio::fs::write(&path, r#"{"backend": {"max_attempts": 0}}"#)
        .await
        .unwrap();

    let err = Config::load_from(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("max_attempts")));
}

#[tokio::test]
async fn test_malformed_config_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    tokio::fs::write(&path, "[1, 2").await.unwrap();

    let err = Config::load_from(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}
