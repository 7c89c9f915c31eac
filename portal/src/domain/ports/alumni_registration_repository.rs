//! Driven port for alumni registration writes.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{RawRegistration, RegistrationForm};

/// Admin decision on a pending registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationDecision {
    /// `PUT /alumni-registration/{id}/approve`.
    Approve,
    /// `PUT /alumni-registration/{id}/reject`.
    Reject,
}

impl RegistrationDecision {
    /// Path segment for the decision endpoint.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Port for submitting and deciding registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniRegistrationRepository: Send + Sync {
    /// `POST /alumni-registration`. A duplicate submission surfaces as
    /// [`BackendError::Conflict`] carrying the backend's message.
    async fn submit(&self, form: &RegistrationForm) -> Result<RawRegistration, BackendError>;

    /// Record an admin decision and return the updated record.
    async fn decide(
        &self,
        registration_id: &str,
        decision: RegistrationDecision,
    ) -> Result<RawRegistration, BackendError>;
}
