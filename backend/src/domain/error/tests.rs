//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no tenant"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("duplicate tag"), ErrorCode::Conflict)]
#[case(Error::invalid_state("insufficient stock"), ErrorCode::InvalidState)]
#[case(Error::service_unavailable("pool down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::InternalError, "");
    assert_eq!(error.message(), FALLBACK_MESSAGE);
}

#[rstest]
fn serialises_with_snake_case_code_and_details() {
    let error = Error::invalid_state("insufficient stock").with_details(json!({"available": 9}));
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_state",
            "message": "insufficient stock",
            "details": {"available": 9}
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let payload = json!({"code": "not_found", "message": " "});
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn is_conflict_only_for_conflicts() {
    assert!(Error::conflict("dup").is_conflict());
    assert!(!Error::not_found("gone").is_conflict());
}
