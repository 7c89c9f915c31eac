//! Driven port for member profiles.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{EmailAddress, Role, UserProfile};

/// Port for reading and writing member profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// `GET /users/{email}`; `None` when the backend has no profile.
    async fn find(&self, email: &EmailAddress) -> Result<Option<UserProfile>, BackendError>;

    /// `PUT /users/{email}` with the full profile.
    async fn save(&self, profile: &UserProfile) -> Result<UserProfile, BackendError>;

    /// `PUT /users/{email}/role`.
    async fn set_role(&self, email: &EmailAddress, role: Role) -> Result<UserProfile, BackendError>;
}
