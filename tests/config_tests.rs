//! Configuration loading and validation tests

use std::collections::HashMap;

use limq::config::{QueueConfig, CAPACITY_ENV, DEFAULT_CAPACITY};
use limq::{BoundedQueue, CloseOptions, Error};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_capacity_is_one() {
    assert_eq!(QueueConfig::default().capacity, DEFAULT_CAPACITY);
    assert_eq!(DEFAULT_CAPACITY, 1);
}

#[test]
fn test_capacity_from_env() {
    let cfg = QueueConfig::from_lookup(lookup(&[(CAPACITY_ENV, " 16 ")])).unwrap();
    assert_eq!(cfg.capacity, 16);

    let cfg = QueueConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, QueueConfig::default());
}

#[test]
fn test_bad_env_capacity_is_config_error() {
    for raw in ["abc", "-3", "0"] {
        let err = QueueConfig::from_lookup(lookup(&[(CAPACITY_ENV, raw)])).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{} gave {:?}", raw, err);
        assert!(!err.suggestions().is_empty());
    }
}

#[test]
fn test_non_numeric_env_capacity_gets_hints() {
    let err = QueueConfig::from_lookup(lookup(&[(CAPACITY_ENV, "abc")])).unwrap_err();
    assert!(err.to_string().contains(CAPACITY_ENV));
    let hints = err.suggestions();
    assert!(hints.iter().any(|h| h.contains("positive integer")));
}

#[test]
fn test_config_deserializes_with_defaults() {
    let cfg: QueueConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.capacity, 1);
    let cfg: QueueConfig = serde_json::from_str(r#"{"capacity": 4}"#).unwrap();
    assert_eq!(BoundedQueue::<u8>::from_config(&cfg).unwrap().capacity(), 4);
}

#[test]
fn test_from_config_rejects_zero() {
    let err = BoundedQueue::<u8>::from_config(&QueueConfig::with_capacity(0)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_close_options_deserialize() {
    let opts: CloseOptions =
        serde_json::from_str(r#"{"reason": "maintenance", "allow_drain": true}"#).unwrap();
    assert_eq!(opts, CloseOptions::drain().with_reason("maintenance"));
    let opts: CloseOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, CloseOptions::default());
}
