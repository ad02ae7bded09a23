use crate::aac_error;
use crate::error::{AacError, ErrorContext, Stage};

#[test]
fn test_error_context_on_result() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "file not found",
    ));

    let aac_result = result.context("Failed to read config file");
    assert!(aac_result.is_err());

    match aac_result {
        Err(AacError::Unknown(msg)) => {
            assert!(msg.contains("Failed to read config file"));
            assert!(msg.contains("file not found"));
        }
        _ => panic!("Expected AacError::Unknown"),
    }
}

#[test]
fn test_error_context_on_option() {
    let option: Option<String> = None;
    let result = option.context("Token not found");

    match result {
        Err(AacError::Unknown(msg)) => assert_eq!(msg, "Token not found"),
        _ => panic!("Expected AacError::Unknown"),
    }
}

#[test]
fn test_error_context_with_closure() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "access denied",
    ));

    let aac_result = result.with_context(|| format!("Failed to write snapshot to: {}", "/tmp/acme.yaml"));

    match aac_result {
        Err(AacError::Unknown(msg)) => {
            assert!(msg.contains("Failed to write snapshot to: /tmp/acme.yaml"));
            assert!(msg.contains("access denied"));
        }
        _ => panic!("Expected AacError::Unknown"),
    }
}

#[test]
fn test_aac_error_macro() {
    let error = aac_error!(ApiError, "Request failed");
    match error {
        AacError::ApiError(msg) => assert_eq!(msg, "Request failed"),
        _ => panic!("Expected AacError::ApiError"),
    }

    let error = aac_error!(ProtocolError, "cursor {} repeated", "Y3Vyc29yOjI=");
    match error {
        AacError::ProtocolError(msg) => assert_eq!(msg, "cursor Y3Vyc29yOjI= repeated"),
        _ => panic!("Expected AacError::ProtocolError"),
    }
}

#[test]
fn test_snapshot_failure_names_organization_and_stage() {
    let error = AacError::SnapshotFailed {
        organization: "acme".to_string(),
        stage: Stage::FetchTeams,
        source: Box::new(AacError::ApiError("HTTP 502".to_string())),
    };

    assert_eq!(
        error.to_string(),
        "snapshot for acme failed at teams: API request failed: HTTP 502"
    );
    assert_eq!(error.stage(), Some(Stage::FetchTeams));
    assert!(error.is_transport());
    assert!(!error.is_protocol());
}

#[test]
fn test_protocol_errors_are_not_transport_errors() {
    let error = AacError::SnapshotFailed {
        organization: "acme".to_string(),
        stage: Stage::FetchRepos,
        source: Box::new(AacError::ProtocolError("stale cursor".to_string())),
    };

    assert!(error.is_protocol());
    assert!(!error.is_transport());
    assert_eq!(AacError::TokenNotFound.stage(), None);
}
