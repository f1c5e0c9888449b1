//! Tests for the error handling system

use super::context::{handle_error, try_with_recovery};
use super::*;
use std::io;
use std::path::PathBuf;

fn json_error() -> serde_json::Error {
    serde_json::from_str::<serde_json::Value>("{").unwrap_err()
}

#[test]
fn test_error_severity() {
    assert_eq!(
        ScoutError::syntax_error("nodes.py", "unexpected indent").severity(),
        ErrorSeverity::Warning
    );
    assert_eq!(
        ScoutError::read_error("nodes.py", io::Error::new(io::ErrorKind::NotFound, "gone")).severity(),
        ErrorSeverity::Warning
    );
    assert_eq!(
        ScoutError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")).severity(),
        ErrorSeverity::Error
    );
    assert_eq!(
        ScoutError::ManifestParse { source: json_error() }.severity(),
        ErrorSeverity::Critical
    );
    assert_eq!(
        ScoutError::config_error("Invalid config").severity(),
        ErrorSeverity::Critical
    );
}

#[test]
fn test_is_critical() {
    assert!(ScoutError::invalid_manifest("model without node").is_critical());
    assert!(!ScoutError::syntax_error("nodes.py", "bad").is_critical());
}

#[test]
fn test_user_message() {
    let msg = ScoutError::permission_denied("/test/path").user_message();
    assert!(msg.contains("/test/path"));
    assert!(msg.contains("permission denied"));

    let msg = ScoutError::json_parse_error("/test/workflow.json", json_error()).user_message();
    assert!(msg.contains("/test/workflow.json"));
    assert!(msg.contains("Invalid JSON"));

    let msg = ScoutError::ManifestParse { source: json_error() }.user_message();
    assert!(msg.contains("needed_by"));
}

#[test]
fn test_error_factory_methods() {
    match ScoutError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")) {
        ScoutError::Io { source } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
        other => panic!("Expected Io error, got {:?}", other),
    }

    match ScoutError::syntax_error("pack/nodes.py", "unexpected token") {
        ScoutError::Syntax { path, message } => {
            assert_eq!(path, PathBuf::from("pack/nodes.py"));
            assert_eq!(message, "unexpected token");
        }
        other => panic!("Expected Syntax error, got {:?}", other),
    }

    match ScoutError::config_error("Invalid config") {
        ScoutError::Config { message } => assert_eq!(message, "Invalid config"),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_handle_error() {
    assert!(handle_error(ScoutError::permission_denied("/test/path")).is_none());
    assert!(handle_error(ScoutError::io_error(io::Error::new(io::ErrorKind::Other, "x"))).is_none());
    assert!(handle_error(ScoutError::config_error("Invalid config")).is_some());
}

#[test]
fn test_try_with_recovery() {
    let result = try_with_recovery(|| Ok::<_, ScoutError>(42));
    assert!(matches!(result, Ok(Some(42))));

    let result = try_with_recovery(|| {
        Err::<i32, _>(ScoutError::io_error(io::Error::new(io::ErrorKind::NotFound, "not found")))
    });
    assert!(matches!(result, Ok(None)));

    let result = try_with_recovery(|| Err::<i32, _>(ScoutError::config_error("Invalid config")));
    assert!(result.is_err());
}
