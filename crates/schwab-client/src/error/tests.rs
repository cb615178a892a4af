//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 400,
        message: "{\"errors\":[\"bad symbol\"]}".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("bad symbol"));
}

#[test]
fn test_api_error_status() {
    let error = Error::Api {
        status: 401,
        message: String::new(),
    };

    assert_eq!(error.status(), Some(401));
}

#[test]
fn test_invalid_request_error_display() {
    let error = Error::InvalidRequest("account_hash must not be empty".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Invalid request"));
    assert!(display.contains("account_hash"));
    assert_eq!(error.status(), None);
}

#[test]
fn test_auth_error_display() {
    let error = Error::auth("missing access token");

    assert_eq!(
        format!("{}", error),
        "Authentication error: missing access token"
    );
    assert_eq!(error.status(), None);
}

#[test]
fn test_auth_error_keeps_status_and_source() {
    let source = std::io::Error::other("invalid_grant");
    let error = Error::Auth {
        status: Some(400),
        source: Box::new(source),
    };

    assert_eq!(error.status(), Some(400));
    let source = std::error::Error::source(&error).expect("source kept");
    assert_eq!(source.to_string(), "invalid_grant");
    assert!(source.downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn test_error_debug() {
    let error = Error::Api {
        status: 500,
        message: "Internal server error".to_string(),
    };

    let debug = format!("{:?}", error);
    assert!(debug.contains("Api"));
    assert!(debug.contains("500"));
}
