//! Driven port for reading alumni registrations from the backend.
//!
//! The backend exposes the same fact through several endpoints with
//! different envelopes. Adapters unwrap each envelope into an optional
//! [`RawRegistration`]; deciding which answer to trust is the resolver's job.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{EmailAddress, RawRegistration};

/// Port for the registration read endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniRegistrationSource: Send + Sync {
    /// `GET /alumni-registration/status-by-uid/{uid}`: the `registration`
    /// object when the envelope reports `success`.
    async fn status_by_uid(&self, uid: &str) -> Result<Option<RawRegistration>, BackendError>;

    /// `GET /alumni-registration/check-by-uid/{uid}`: the `submission`
    /// object when the envelope reports `hasSubmitted`.
    async fn check_by_uid(&self, uid: &str) -> Result<Option<RawRegistration>, BackendError>;

    /// `GET /alumni-registration/status/{email}`: a record carrying the flat
    /// status, when one is present.
    async fn status_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<RawRegistration>, BackendError>;

    /// `GET /alumni-registration/approved`.
    async fn list_approved(&self) -> Result<Vec<RawRegistration>, BackendError>;

    /// `GET /alumni-registration/pending`.
    async fn list_pending(&self) -> Result<Vec<RawRegistration>, BackendError>;
}

/// Fixture implementation that knows of no registrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAlumniRegistrationSource;

#[async_trait]
impl AlumniRegistrationSource for FixtureAlumniRegistrationSource {
    async fn status_by_uid(&self, _uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        Ok(None)
    }

    async fn check_by_uid(&self, _uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        Ok(None)
    }

    async fn status_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<RawRegistration>, BackendError> {
        Ok(None)
    }

    async fn list_approved(&self) -> Result<Vec<RawRegistration>, BackendError> {
        Ok(Vec::new())
    }

    async fn list_pending(&self) -> Result<Vec<RawRegistration>, BackendError> {
        Ok(Vec::new())
    }
}
