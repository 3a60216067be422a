//! Error display, context and suggestion tests

use limq::{CloseReason, Error};

#[test]
fn test_closed_error_display() {
    assert_eq!(Error::Closed { reason: None }.to_string(), "queue is closed");
    let err = Error::Closed {
        reason: Some(CloseReason::from(String::from("upstream failed"))),
    };
    assert_eq!(err.to_string(), "queue is closed: upstream failed");
    assert_eq!(err.close_reason().unwrap().to_string(), "upstream failed");
}

#[test]
fn test_closed_error_keeps_identity_under_context() {
    let err = Error::Closed { reason: None }.with_context("while draining");
    assert!(err.is_closed());
    assert!(err.close_reason().is_none());
}

#[test]
fn test_config_error_with_context() {
    let err = Error::Config("capacity must be at least 1".into()).with_context("loading bench config");
    match err {
        Error::Config(msg) => {
            assert!(msg.starts_with("loading bench config"));
            assert!(msg.contains("capacity"));
        }
        _ => panic!("Expected Config variant"),
    }

    let err = Error::InvalidCapacity(0).with_context("building queue");
    assert!(matches!(err, Error::Config(msg) if msg.contains("invalid capacity 0")));
}

#[test]
fn test_error_suggestions() {
    let closed = Error::Closed { reason: None };
    assert!(closed.suggestions().iter().any(|s| s.contains("new queue")));

    let cap = Error::InvalidCapacity(0);
    assert!(cap.suggestions().iter().any(|s| s.contains("at least 1")));

    assert!(Error::Config("unrelated".into()).suggestions().is_empty());
}
