//! Normalization precedence and registration form validation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn record(status: Option<&str>, approval: Option<bool>, approved_at: Option<&str>) -> RawRegistration {
    RawRegistration {
        status: status.map(str::to_owned),
        approval,
        approved_at: approved_at.map(|stamp| json!(stamp)),
        ..RawRegistration::default()
    }
}

#[rstest]
#[case::plain_pending(Some("pending"), None, None, AlumniStatus::Pending)]
#[case::approval_true_without_status(None, Some(true), None, AlumniStatus::Approved)]
#[case::approved_at_overrides_pending(Some("pending"), None, Some("2024-01-01"), AlumniStatus::Approved)]
#[case::accepted_synonym(Some("accepted"), None, None, AlumniStatus::Approved)]
#[case::accepted_beats_false_approval(Some("accepted"), Some(false), None, AlumniStatus::Approved)]
#[case::approval_false_rejects(Some("pending"), Some(false), None, AlumniStatus::Rejected)]
#[case::approval_true_beats_rejected(Some("rejected"), Some(true), None, AlumniStatus::Approved)]
#[case::rejected_kept(Some("rejected"), None, None, AlumniStatus::Rejected)]
#[case::approved_kept(Some("Approved"), None, None, AlumniStatus::Approved)]
#[case::shouted_accepted(Some("ACCEPTED"), None, None, AlumniStatus::Approved)]
#[case::padded_accepted(Some(" accepted "), None, None, AlumniStatus::Approved)]
#[case::padded_rejected(Some(" Rejected\n"), None, None, AlumniStatus::Rejected)]
#[case::nothing_defaults_pending(None, None, None, AlumniStatus::Pending)]
#[case::blank_status_defaults_pending(Some("  "), None, None, AlumniStatus::Pending)]
#[case::unknown_status_defaults_pending(Some("under_review"), None, None, AlumniStatus::Pending)]
fn normalizes_raw_signals(
    #[case] status: Option<&str>,
    #[case] approval: Option<bool>,
    #[case] approved_at: Option<&str>,
    #[case] expected: AlumniStatus,
) {
    assert_eq!(record(status, approval, approved_at).normalize(), expected);
}

#[rstest]
#[case::rejected_status(Some("rejected"), None)]
#[case::false_approval(Some("pending"), Some(false))]
#[case::false_approval_no_status(None, Some(false))]
#[case::unknown(Some("whatever"), None)]
fn approved_at_wins_over_every_other_signal(
    #[case] status: Option<&str>,
    #[case] approval: Option<bool>,
) {
    let raw = record(status, approval, Some("2023-06-30T10:00:00.000Z"));
    assert_eq!(raw.normalize(), AlumniStatus::Approved);
}

#[test]
fn blank_approved_at_is_ignored() {
    assert_eq!(record(Some("pending"), None, Some("")).normalize(), AlumniStatus::Pending);
}

#[rstest]
#[case::epoch_millis(json!(1_704_067_200_000_i64))]
#[case::timestamp_object(json!({ "_seconds": 1_704_067_200, "_nanoseconds": 0 }))]
#[case::iso_string(json!("2024-01-01T00:00:00.000Z"))]
fn any_approval_stamp_shape_forces_approved(#[case] stamp: Value) {
    let raw = RawRegistration {
        approved_at: Some(stamp),
        ..RawRegistration::with_status("pending")
    };
    assert!(raw.approved_at_present());
    assert_eq!(raw.normalize(), AlumniStatus::Approved);
}

#[test]
fn null_approval_stamp_is_absent() {
    let raw = RawRegistration {
        approved_at: Some(Value::Null),
        ..RawRegistration::with_status("pending")
    };
    assert!(!raw.approved_at_present());
    assert_eq!(raw.normalize(), AlumniStatus::Pending);
}

#[test]
fn normalization_is_stable_under_reapplication() {
    let raw = record(Some("accepted"), None, None);
    let once = raw.normalize();
    let again = RawRegistration::with_status(once.as_str()).normalize();
    assert_eq!(once, again);
}

#[test]
fn or_status_only_fills_missing_status() {
    let filled = RawRegistration::default().or_status(AlumniStatus::Approved);
    assert_eq!(filled.status.as_deref(), Some("approved"));

    let kept = RawRegistration::with_status("rejected").or_status(AlumniStatus::Approved);
    assert_eq!(kept.status.as_deref(), Some("rejected"));
}

#[test]
fn decodes_backend_record_shape() {
    let raw: RawRegistration = serde_json::from_value(json!({
        "_id": "65f0c0ffee",
        "email": "ada@example.edu",
        "firebaseUid": "uid-ada",
        "status": "accepted",
        "approval": null,
        "approvedAt": null
    }))
    .expect("decode registration");
    assert_eq!(raw.id.as_deref(), Some("65f0c0ffee"));
    assert_eq!(raw.firebase_uid.as_deref(), Some("uid-ada"));
    assert_eq!(raw.approval, None);
    assert_eq!(raw.normalize(), AlumniStatus::Approved);
}

#[rstest]
#[case::both_ids(json!({ "_id": "a1", "id": "a1-virtual", "status": "approved" }), Some("a1"))]
#[case::virtual_only(json!({ "id": "a1-virtual", "status": "approved" }), Some("a1-virtual"))]
#[case::no_id(json!({ "status": "approved" }), None)]
fn stored_id_wins_over_virtual_id(#[case] body: Value, #[case] expected: Option<&str>) {
    let raw: RawRegistration = serde_json::from_value(body).expect("decode registration");
    assert_eq!(raw.id.as_deref(), expected);
    assert_eq!(raw.normalize(), AlumniStatus::Approved);
}

#[fixture]
fn identity() -> AlumniIdentity {
    AlumniIdentity::new(
        "uid-ada",
        EmailAddress::new("Ada@Example.edu").expect("email"),
    )
}

#[rstest]
#[case::email_case_insensitive(Some("ada@example.edu"), None, true)]
#[case::uid(None, Some("uid-ada"), true)]
#[case::other_person(Some("grace@example.edu"), Some("uid-grace"), false)]
#[case::blank_uid(None, Some(""), false)]
fn identity_ownership(
    identity: AlumniIdentity,
    #[case] email: Option<&str>,
    #[case] uid: Option<&str>,
    #[case] expected: bool,
) {
    let raw = RawRegistration {
        email: email.map(str::to_owned),
        firebase_uid: uid.map(str::to_owned),
        ..RawRegistration::default()
    };
    assert_eq!(identity.owns(&raw), expected);
}

#[fixture]
fn form() -> RegistrationForm {
    RegistrationForm {
        name: "Ada Lovelace".to_owned(),
        email: EmailAddress::new("ada@example.edu").expect("email"),
        firebase_uid: "uid-ada".to_owned(),
        graduation_year: 2019,
        department: "Computer Science".to_owned(),
        student_id: None,
        phone: None,
        current_position: None,
        organization: None,
    }
}

#[rstest]
fn valid_form_passes(form: RegistrationForm) {
    assert_eq!(form.validate_for_year(2026), Ok(()));
}

#[rstest]
#[case::too_early(1949)]
#[case::too_late(2033)]
fn graduation_year_window_is_enforced(mut form: RegistrationForm, #[case] year: i32) {
    form.graduation_year = year;
    let err = form.validate_for_year(2026).expect_err("out of range");
    assert_eq!(err.field(), "graduationYear");
}

#[rstest]
fn blank_department_is_reported(mut form: RegistrationForm) {
    form.department = " ".to_owned();
    assert_eq!(
        form.validate_for_year(2026),
        Err(RegistrationValidationError::EmptyDepartment)
    );
}

#[rstest]
fn form_serialises_with_backend_field_names(form: RegistrationForm) {
    let value = serde_json::to_value(&form).expect("serialise form");
    assert_eq!(value["firebaseUid"], "uid-ada");
    assert_eq!(value["graduationYear"], 2019);
    assert!(value.get("studentId").is_none());
}
