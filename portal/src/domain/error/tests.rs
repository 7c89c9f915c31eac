//! Construction rules and the user-facing message fallback.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const FALLBACK: &str = "Something went wrong. Please try again.";

#[fixture]
fn duplicate_registration() -> Error {
    Error::conflict("alumni registration rejected by backend")
        .with_server_message(Some("Registration already submitted".to_owned()))
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest, "invalid_request")]
#[case::forbidden(Error::forbidden("admins only"), ErrorCode::Forbidden, "forbidden")]
#[case::unavailable(
    Error::service_unavailable("timed out"),
    ErrorCode::ServiceUnavailable,
    "service_unavailable"
)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError, "internal_error")]
fn constructors_set_codes(#[case] err: Error, #[case] code: ErrorCode, #[case] label: &str) {
    assert_eq!(err.code(), code);
    assert_eq!(err.code().to_string(), label);
}

#[rstest]
#[case::empty("")]
#[case::spaces("   ")]
fn blank_messages_are_refused(#[case] message: &str) {
    let result = Error::try_new(ErrorCode::InvalidRequest, message);
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn display_shows_the_diagnostic(duplicate_registration: Error) {
    assert_eq!(
        duplicate_registration.to_string(),
        "alumni registration rejected by backend"
    );
}

#[rstest]
fn user_message_prefers_server_text(duplicate_registration: Error) {
    assert_eq!(
        duplicate_registration.user_message(FALLBACK),
        "Registration already submitted"
    );
}

#[rstest]
#[case::absent(None)]
#[case::blank(Some("   ".to_owned()))]
fn user_message_falls_back_without_server_text(#[case] server_message: Option<String>) {
    let err = Error::internal("boom").with_server_message(server_message);
    assert_eq!(err.user_message(FALLBACK), FALLBACK);
    assert!(err.server_message().is_none());
}

#[rstest]
fn details_ride_along(duplicate_registration: Error) {
    let err = duplicate_registration.with_details(json!({ "id": "r1" }));
    assert_eq!(err.details(), Some(&json!({ "id": "r1" })));
    assert_eq!(err.server_message(), Some("Registration already submitted"));
}
