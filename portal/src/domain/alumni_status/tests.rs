//! Resolver ordering, fallthrough and normalization.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::EmailAddress;
use crate::domain::ports::MockAlumniRegistrationSource;

#[fixture]
fn identity() -> AlumniIdentity {
    AlumniIdentity::new(
        "uid-ada",
        EmailAddress::new("ada@example.edu").expect("valid email"),
    )
}

fn record_for(email: &str, status: Option<&str>) -> RawRegistration {
    RawRegistration {
        email: Some(email.to_owned()),
        status: status.map(str::to_owned),
        ..RawRegistration::default()
    }
}

fn resolver(source: MockAlumniRegistrationSource) -> AlumniStatusResolver<MockAlumniRegistrationSource> {
    AlumniStatusResolver::new(Arc::new(source))
}

#[rstest]
#[tokio::test]
async fn first_source_answer_wins(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source
        .expect_status_by_uid()
        .withf(|uid| uid == "uid-ada")
        .times(1)
        .returning(|_| Ok(Some(RawRegistration::with_status("pending"))));
    source.expect_check_by_uid().times(0);
    source.expect_status_by_email().times(0);
    source.expect_list_approved().times(0);
    source.expect_list_pending().times(0);

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Pending)
    );
}

#[rstest]
#[tokio::test]
async fn failing_source_falls_through_to_next(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source
        .expect_status_by_uid()
        .times(1)
        .returning(|_| Err(BackendError::transport("connection reset")));
    source
        .expect_check_by_uid()
        .times(1)
        .returning(|_| Ok(Some(RawRegistration::with_status("accepted"))));
    source.expect_status_by_email().times(0);
    source.expect_list_approved().times(0);
    source.expect_list_pending().times(0);

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Approved)
    );
}

#[rstest]
#[tokio::test]
async fn empty_answers_reach_the_email_lookup(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source.expect_status_by_uid().times(1).returning(|_| Ok(None));
    source.expect_check_by_uid().times(1).returning(|_| Ok(None));
    source
        .expect_status_by_email()
        .withf(|email| email.matches("ada@example.edu"))
        .times(1)
        .returning(|_| Ok(Some(RawRegistration::with_status("rejected"))));
    source.expect_list_approved().times(0);
    source.expect_list_pending().times(0);

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Rejected)
    );
}

#[rstest]
#[tokio::test]
async fn approved_listing_match_without_status_reads_approved(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source.expect_status_by_uid().returning(|_| Ok(None));
    source.expect_check_by_uid().returning(|_| Ok(None));
    source
        .expect_status_by_email()
        .returning(|_| Err(BackendError::not_found("no registration")));
    source.expect_list_approved().times(1).returning(|| {
        Ok(vec![
            record_for("grace@example.edu", Some("approved")),
            record_for("ADA@example.edu", None),
        ])
    });
    source.expect_list_pending().times(0);

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Approved)
    );
}

#[rstest]
#[tokio::test]
async fn pending_listing_matches_on_uid(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source.expect_status_by_uid().returning(|_| Ok(None));
    source.expect_check_by_uid().returning(|_| Ok(None));
    source.expect_status_by_email().returning(|_| Ok(None));
    source.expect_list_approved().returning(|| Ok(Vec::new()));
    source.expect_list_pending().times(1).returning(|| {
        Ok(vec![RawRegistration {
            firebase_uid: Some("uid-ada".to_owned()),
            email: Some("old-address@example.edu".to_owned()),
            ..RawRegistration::default()
        }])
    });

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Pending)
    );
}

#[rstest]
#[tokio::test]
async fn pending_listing_still_honours_approved_at(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source.expect_status_by_uid().returning(|_| Ok(None));
    source.expect_check_by_uid().returning(|_| Ok(None));
    source.expect_status_by_email().returning(|_| Ok(None));
    source.expect_list_approved().returning(|| Ok(Vec::new()));
    source.expect_list_pending().returning(|| {
        Ok(vec![RawRegistration {
            approved_at: Some(json!(1_704_067_200_000_i64)),
            ..record_for("ada@example.edu", Some("pending"))
        }])
    });

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Approved)
    );
}

#[rstest]
#[tokio::test]
async fn exhaustion_means_not_registered(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source
        .expect_status_by_uid()
        .times(1)
        .returning(|_| Err(BackendError::timeout("15s")));
    source
        .expect_check_by_uid()
        .times(1)
        .returning(|_| Err(BackendError::rejected(500_u16, "boom")));
    source.expect_status_by_email().times(1).returning(|_| Ok(None));
    source
        .expect_list_approved()
        .times(1)
        .returning(|| Ok(vec![record_for("grace@example.edu", Some("approved"))]));
    source
        .expect_list_pending()
        .times(1)
        .returning(|| Err(BackendError::decode("expected array")));

    assert_eq!(resolver(source).resolve(&identity).await, None);
}

#[rstest]
#[tokio::test]
async fn uid_sources_are_skipped_without_a_uid() {
    let identity = AlumniIdentity::new(
        "  ",
        EmailAddress::new("ada@example.edu").expect("valid email"),
    );
    let mut source = MockAlumniRegistrationSource::new();
    source.expect_status_by_uid().times(0);
    source.expect_check_by_uid().times(0);
    source
        .expect_status_by_email()
        .times(1)
        .returning(|_| Ok(Some(RawRegistration::with_status("approved"))));

    assert_eq!(
        resolver(source).resolve(&identity).await,
        Some(AlumniStatus::Approved)
    );
}

#[rstest]
#[tokio::test]
async fn custom_order_is_respected(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source
        .expect_list_pending()
        .times(1)
        .returning(|| Ok(vec![record_for("ada@example.edu", None)]));
    source.expect_status_by_uid().times(0);

    let resolver = resolver(source).with_sources([StatusSource::PendingList, StatusSource::StatusByUid]);
    assert_eq!(
        resolver.sources(),
        &[StatusSource::PendingList, StatusSource::StatusByUid]
    );
    assert_eq!(resolver.resolve(&identity).await, Some(AlumniStatus::Pending));
}

#[rstest]
#[tokio::test]
async fn driving_port_delegates_to_resolver(identity: AlumniIdentity) {
    let mut source = MockAlumniRegistrationSource::new();
    source
        .expect_status_by_uid()
        .returning(|_| Ok(Some(RawRegistration::with_status("approved"))));
    let query: Arc<dyn AlumniStatusQuery> = Arc::new(resolver(source));

    assert_eq!(query.resolve(&identity).await, Some(AlumniStatus::Approved));
}

#[test]
fn default_order_matches_the_documented_fallback() {
    let labels: Vec<_> = StatusSource::DEFAULT_ORDER
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        labels,
        [
            "status_by_uid",
            "check_by_uid",
            "status_by_email",
            "approved_list",
            "pending_list"
        ]
    );
}
