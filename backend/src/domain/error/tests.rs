//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest, 400)]
#[case(Error::unauthorized("no auth"), ErrorCode::Unauthorized, 401)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden, 403)]
#[case(Error::not_found("missing"), ErrorCode::NotFound, 404)]
#[case(Error::conflict("Email already exists"), ErrorCode::Conflict, 409)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable, 503)]
#[case(Error::internal("boom"), ErrorCode::InternalError, 500)]
fn constructors_set_code_and_status(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] status: u16,
) {
    assert_eq!(error.code(), code);
    assert_eq!(error.code().http_status(), status);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn redacted_hides_internal_details(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": true}));

    let redacted = error.redacted();
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
    assert_eq!(redacted.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn redacted_keeps_client_errors_intact() {
    let error = Error::conflict("Email already exists").with_details(json!({"field": "email"}));
    assert_eq!(error.redacted(), error);
}

#[rstest]
fn serialises_to_camel_case_and_back(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "email"}));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value.get("code"), Some(&json!("invalid_request")));
    assert_eq!(value.get("traceId"), Some(&json!(TRACE_ID)));

    let parsed: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(parsed, error);
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "not_found", "message": " "}));
    assert!(result.is_err());
}
