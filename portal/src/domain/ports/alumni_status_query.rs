//! Driving port for resolving the signed-in user's alumni status.

use async_trait::async_trait;

use crate::domain::{AlumniIdentity, AlumniStatus};

/// Use-case port: current registration status, or `None` when the user has
/// not registered. Resolution never fails; unreachable sources read as
/// "no answer".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniStatusQuery: Send + Sync {
    /// Resolve the normalized status for `identity`.
    async fn resolve(&self, identity: &AlumniIdentity) -> Option<AlumniStatus>;
}

/// Fixture query that always reports the same answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAlumniStatusQuery(pub Option<AlumniStatus>);

#[async_trait]
impl AlumniStatusQuery for FixtureAlumniStatusQuery {
    async fn resolve(&self, _identity: &AlumniIdentity) -> Option<AlumniStatus> {
        self.0
    }
}
