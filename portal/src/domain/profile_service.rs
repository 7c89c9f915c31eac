//! Member profile service and the admin gate shared by admin-only services.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::UserProfileRepository;
use crate::domain::{EmailAddress, Error, Role, UserProfile};

/// Load `actor`'s profile and require the admin role.
///
/// A missing profile is treated as a non-admin.
pub(crate) async fn require_admin<U>(profiles: &U, actor: &EmailAddress) -> Result<UserProfile, Error>
where
    U: UserProfileRepository + ?Sized,
{
    let profile = profiles
        .find(actor)
        .await
        .map_err(|err| err.into_domain("load acting profile"))?;
    match profile {
        Some(profile) if profile.is_admin() => Ok(profile),
        _ => {
            warn!(actor = %actor, "admin operation refused");
            Err(Error::forbidden(format!("{actor} is not an administrator"))
                .with_server_message(Some("Administrator access required".to_owned())))
        }
    }
}

/// Reads and updates member profiles.
pub struct UserProfileService<U: ?Sized> {
    profiles: Arc<U>,
}

impl<U: ?Sized> Clone for UserProfileService<U> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl<U: ?Sized> UserProfileService<U> {
    /// Create the service.
    pub fn new(profiles: Arc<U>) -> Self {
        Self { profiles }
    }
}

impl<U> UserProfileService<U>
where
    U: UserProfileRepository + ?Sized,
{
    /// Profile for `email`, if the backend has one.
    pub async fn fetch(&self, email: &EmailAddress) -> Result<Option<UserProfile>, Error> {
        self.profiles
            .find(email)
            .await
            .map_err(|err| err.into_domain("load profile"))
    }

    /// Replace the stored profile.
    ///
    /// The role is not editable here; whatever the backend holds is kept.
    pub async fn update(&self, profile: &UserProfile) -> Result<UserProfile, Error> {
        let mut outgoing = profile.clone();
        if let Some(stored) = self.fetch(&profile.email).await? {
            outgoing.role = stored.role;
        }
        let saved = self
            .profiles
            .save(&outgoing)
            .await
            .map_err(|err| err.into_domain("save profile"))?;
        info!(email = %saved.email, "profile updated");
        Ok(saved)
    }

    /// Change `target`'s role. `actor` must be an admin.
    pub async fn change_role(
        &self,
        actor: &EmailAddress,
        target: &EmailAddress,
        role: Role,
    ) -> Result<UserProfile, Error> {
        require_admin(self.profiles.as_ref(), actor).await?;
        let updated = self
            .profiles
            .set_role(target, role)
            .await
            .map_err(|err| err.into_domain("change role"))?;
        info!(actor = %actor, target = %target, role = %role, "role changed");
        Ok(updated)
    }

    /// Whether `email` holds the admin role.
    pub async fn is_admin(&self, email: &EmailAddress) -> Result<bool, Error> {
        Ok(self.fetch(email).await?.is_some_and(|profile| profile.is_admin()))
    }
}
