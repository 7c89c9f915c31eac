//! Scripted registration source for resolver scenarios.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{AlumniRegistrationSource, BackendError};
use crate::domain::{EmailAddress, RawRegistration, StatusSource};

/// What a scripted source answers when asked.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// A single-record endpoint answer.
    Record(Option<RawRegistration>),
    /// A listing endpoint answer.
    Listing(Vec<RawRegistration>),
    /// The endpoint fails.
    Failure(BackendError),
}

/// Registration source whose answers are set per endpoint.
///
/// Unscripted endpoints answer "nothing". Every call is recorded in order.
#[derive(Default)]
pub struct ScriptedRegistrationSource {
    outcomes: Mutex<HashMap<StatusSource, ScriptedOutcome>>,
    calls: Mutex<Vec<StatusSource>>,
}

impl ScriptedRegistrationSource {
    /// Source with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for `source`, replacing any earlier script.
    pub fn script(&self, source: StatusSource, outcome: ScriptedOutcome) {
        lock(&self.outcomes).insert(source, outcome);
    }

    /// Endpoints asked so far, oldest first.
    pub fn calls(&self) -> Vec<StatusSource> {
        lock(&self.calls).clone()
    }

    fn answer(&self, source: StatusSource) -> Option<ScriptedOutcome> {
        lock(&self.calls).push(source);
        lock(&self.outcomes).get(&source).cloned()
    }

    fn record(&self, source: StatusSource) -> Result<Option<RawRegistration>, BackendError> {
        match self.answer(source) {
            None => Ok(None),
            Some(ScriptedOutcome::Record(record)) => Ok(record),
            Some(ScriptedOutcome::Listing(records)) => Ok(records.into_iter().next()),
            Some(ScriptedOutcome::Failure(error)) => Err(error),
        }
    }

    fn listing(&self, source: StatusSource) -> Result<Vec<RawRegistration>, BackendError> {
        match self.answer(source) {
            None => Ok(Vec::new()),
            Some(ScriptedOutcome::Record(record)) => Ok(record.into_iter().collect()),
            Some(ScriptedOutcome::Listing(records)) => Ok(records),
            Some(ScriptedOutcome::Failure(error)) => Err(error),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("scripted source mutex poisoned"),
    }
}

#[async_trait]
impl AlumniRegistrationSource for ScriptedRegistrationSource {
    async fn status_by_uid(&self, _uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        self.record(StatusSource::StatusByUid)
    }

    async fn check_by_uid(&self, _uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        self.record(StatusSource::CheckByUid)
    }

    async fn status_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<RawRegistration>, BackendError> {
        self.record(StatusSource::StatusByEmail)
    }

    async fn list_approved(&self) -> Result<Vec<RawRegistration>, BackendError> {
        self.listing(StatusSource::ApprovedList)
    }

    async fn list_pending(&self) -> Result<Vec<RawRegistration>, BackendError> {
        self.listing(StatusSource::PendingList)
    }
}
