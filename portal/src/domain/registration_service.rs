//! Alumni registration submission and admin review.

use std::sync::Arc;

use chrono::Datelike;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AlumniRegistrationRepository, AlumniRegistrationSource, RegistrationDecision,
    UserProfileRepository,
};
use crate::domain::profile_service::require_admin;
use crate::domain::{AlumniStatus, EmailAddress, Error, RawRegistration, RegistrationForm};

/// Port bundle for [`AlumniRegistrationService`].
pub struct AlumniRegistrationPorts<R: ?Sized, S: ?Sized, U: ?Sized> {
    /// Registration writes.
    pub registrations: Arc<R>,
    /// Registration listings.
    pub listings: Arc<S>,
    /// Profiles, for the admin gate.
    pub profiles: Arc<U>,
}

/// Submission and review of alumni registrations.
pub struct AlumniRegistrationService<R: ?Sized, S: ?Sized, U: ?Sized> {
    ports: AlumniRegistrationPorts<R, S, U>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, S: ?Sized, U: ?Sized> AlumniRegistrationService<R, S, U> {
    /// Create the service.
    pub fn new(ports: AlumniRegistrationPorts<R, S, U>, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }
}

impl<R, S, U> AlumniRegistrationService<R, S, U>
where
    R: AlumniRegistrationRepository + ?Sized,
    S: AlumniRegistrationSource + ?Sized,
    U: UserProfileRepository + ?Sized,
{
    /// Validate and submit a registration.
    ///
    /// A second submission for the same account comes back as a conflict
    /// carrying the backend's explanation.
    pub async fn submit(&self, form: &RegistrationForm) -> Result<RawRegistration, Error> {
        let year_now = self.clock.utc().year();
        form.validate_for_year(year_now).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
        })?;
        let created = self
            .ports
            .registrations
            .submit(form)
            .await
            .map_err(|err| {
                warn!(
                    email = %form.email,
                    kind = err.kind(),
                    error = %err,
                    "registration submission failed"
                );
                err.into_domain("submit registration")
            })?;
        info!(email = %form.email, "registration submitted");
        Ok(created)
    }

    /// Registrations currently in `status`. Admin only.
    ///
    /// Listing records without a status take the status of their listing.
    pub async fn list(
        &self,
        actor: &EmailAddress,
        status: AlumniStatus,
    ) -> Result<Vec<RawRegistration>, Error> {
        require_admin(self.ports.profiles.as_ref(), actor).await?;
        let records = match status {
            AlumniStatus::Pending => self.ports.listings.list_pending().await,
            AlumniStatus::Approved => self.ports.listings.list_approved().await,
            AlumniStatus::Rejected => {
                return Err(Error::invalid_request(
                    "rejected registrations are not listed by the backend",
                ));
            }
        }
        .map_err(|err| err.into_domain("list registrations"))?;
        Ok(records
            .into_iter()
            .map(|record| record.or_status(status))
            .collect())
    }

    /// Approve or reject a registration. Admin only.
    pub async fn decide(
        &self,
        actor: &EmailAddress,
        registration_id: &str,
        decision: RegistrationDecision,
    ) -> Result<RawRegistration, Error> {
        if registration_id.trim().is_empty() {
            return Err(Error::invalid_request("registration id is required"));
        }
        require_admin(self.ports.profiles.as_ref(), actor).await?;
        let updated = self
            .ports
            .registrations
            .decide(registration_id, decision)
            .await
            .map_err(|err| err.into_domain("decide registration"))?;
        info!(
            actor = %actor,
            registration_id,
            decision = decision.path_segment(),
            "registration decided"
        );
        Ok(updated)
    }
}
