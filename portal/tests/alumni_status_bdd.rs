//! Behaviour-driven tests for alumni status resolution.

use std::sync::Arc;

use portal::domain::ports::BackendError;
use portal::domain::{
    AlumniIdentity, AlumniStatus, AlumniStatusResolver, EmailAddress, RawRegistration,
    StatusSource,
};
use portal::test_support::{ScriptedOutcome, ScriptedRegistrationSource};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

#[derive(Default, ScenarioState)]
struct ResolverWorld {
    source: Slot<Arc<ScriptedRegistrationSource>>,
    identity: Slot<AlumniIdentity>,
    outcome: Slot<Option<AlumniStatus>>,
}

impl ResolverWorld {
    fn source(&self) -> Arc<ScriptedRegistrationSource> {
        self.source.get().expect("member should be set up first")
    }

    fn start(&self, uid: &str, email: &str) {
        let email = EmailAddress::new(email).expect("valid email");
        self.identity.set(AlumniIdentity::new(uid, email));
        self.source.set(Arc::new(ScriptedRegistrationSource::new()));
    }
}

#[fixture]
fn world() -> ResolverWorld {
    ResolverWorld::default()
}

fn source_named(label: &str) -> StatusSource {
    StatusSource::DEFAULT_ORDER
        .into_iter()
        .find(|source| source.label() == label)
        .unwrap_or_else(|| panic!("unknown endpoint {label}"))
}

#[given("a member with uid {uid} and email {email}")]
fn a_member_with_uid_and_email(world: &ResolverWorld, uid: String, email: String) {
    world.start(&uid, &email);
}

#[given("a member without a uid and email {email}")]
fn a_member_without_a_uid(world: &ResolverWorld, email: String) {
    world.start("", &email);
}

#[given("the {endpoint} endpoint fails")]
fn the_endpoint_fails(world: &ResolverWorld, endpoint: String) {
    world.source().script(
        source_named(&endpoint),
        ScriptedOutcome::Failure(BackendError::transport("connection reset")),
    );
}

#[given("the {endpoint} endpoint reports {status}")]
fn the_endpoint_reports(world: &ResolverWorld, endpoint: String, status: String) {
    world.source().script(
        source_named(&endpoint),
        ScriptedOutcome::Record(Some(RawRegistration::with_status(status))),
    );
}

#[given("every endpoint fails")]
fn every_endpoint_fails(world: &ResolverWorld) {
    let source = world.source();
    for endpoint in StatusSource::DEFAULT_ORDER {
        source.script(
            endpoint,
            ScriptedOutcome::Failure(BackendError::rejected(503_u16, "maintenance")),
        );
    }
}

#[given("the {listing} listing contains {email}")]
fn the_listing_contains(world: &ResolverWorld, listing: String, email: String) {
    let endpoint = match listing.as_str() {
        "approved" => StatusSource::ApprovedList,
        "pending" => StatusSource::PendingList,
        other => panic!("unknown listing {other}"),
    };
    let record = RawRegistration {
        email: Some(email),
        ..RawRegistration::default()
    };
    world
        .source()
        .script(endpoint, ScriptedOutcome::Listing(vec![record]));
}

#[given("the pending entry for {email} carries approval date {stamp}")]
fn the_pending_entry_carries_approval_date(world: &ResolverWorld, email: String, stamp: String) {
    let record = RawRegistration {
        email: Some(email),
        approved_at: Some(serde_json::Value::String(stamp)),
        ..RawRegistration::with_status("pending")
    };
    world.source().script(
        StatusSource::PendingList,
        ScriptedOutcome::Listing(vec![record]),
    );
}

#[when("the alumni status is resolved")]
fn the_alumni_status_is_resolved(world: &ResolverWorld) {
    let identity = world.identity.get().expect("member should be set up first");
    let resolver = AlumniStatusResolver::new(world.source());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let outcome = runtime.block_on(resolver.resolve(&identity));
    world.outcome.set(outcome);
}

#[then("the status is {status}")]
fn the_status_is(world: &ResolverWorld, status: String) {
    let expected: AlumniStatus = status.parse().expect("known status");
    let outcome = world.outcome.get().expect("status should be resolved");
    assert_eq!(outcome, Some(expected));
}

#[then("the member is not registered")]
fn the_member_is_not_registered(world: &ResolverWorld) {
    let outcome = world.outcome.get().expect("status should be resolved");
    assert_eq!(outcome, None);
}

#[then("the queried endpoints were {endpoints}")]
fn the_queried_endpoints_were(world: &ResolverWorld, endpoints: String) {
    let expected: Vec<StatusSource> = endpoints
        .split(',')
        .map(|label| source_named(label.trim()))
        .collect();
    assert_eq!(world.source().calls(), expected);
}

#[scenario(
    path = "tests/features/alumni_status.feature",
    name = "The first answering endpoint wins"
)]
fn the_first_answering_endpoint_wins(world: ResolverWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/alumni_status.feature",
    name = "An approval date overrides a pending listing"
)]
fn an_approval_date_overrides_a_pending_listing(world: ResolverWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/alumni_status.feature",
    name = "Approved listings imply approval"
)]
fn approved_listings_imply_approval(world: ResolverWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/alumni_status.feature",
    name = "Unknown members are not registered"
)]
fn unknown_members_are_not_registered(world: ResolverWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/alumni_status.feature",
    name = "A member without a uid is matched by email only"
)]
fn a_member_without_a_uid_is_matched_by_email_only(world: ResolverWorld) {
    drop(world);
}
