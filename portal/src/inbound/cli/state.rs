//! Port bundle the command handlers run against.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;

use crate::domain::ports::{
    AlumniRegistrationRepository, AlumniRegistrationSource, ContentRepository, IdentityProvider,
    ResearchProfileRepository, UserProfileRepository,
};
use crate::domain::{
    AdminContentService, AlumniRegistrationPorts, AlumniRegistrationService, AlumniStatusResolver,
    Error, ResearchProfileService, SessionManager, StatusMonitor, StatusMonitorConfig,
    UserProfileService,
};

/// Dependency bundle for command handlers.
#[derive(Clone)]
pub struct CliState {
    /// Registration writes and admin decisions.
    pub registrations: Arc<dyn AlumniRegistrationRepository>,
    /// The five status endpoints the resolver consults.
    pub listings: Arc<dyn AlumniRegistrationSource>,
    /// Member profiles.
    pub profiles: Arc<dyn UserProfileRepository>,
    /// Research profiles and PDF uploads.
    pub research: Arc<dyn ResearchProfileRepository>,
    /// Events, news and committee members.
    pub content: Arc<dyn ContentRepository>,
    /// Absent when no identity API key is configured.
    pub identity: Option<Arc<dyn IdentityProvider>>,
    /// Timestamps for status snapshots.
    pub clock: Arc<dyn Clock>,
    /// Period between background status checks in `watch`.
    pub poll_interval: Duration,
}

impl CliState {
    pub(super) fn resolver(&self) -> AlumniStatusResolver<dyn AlumniRegistrationSource> {
        AlumniStatusResolver::new(Arc::clone(&self.listings))
    }

    pub(super) fn monitor(&self) -> StatusMonitor {
        StatusMonitor::new(
            Arc::new(self.resolver()),
            Arc::clone(&self.clock),
            StatusMonitorConfig {
                poll_interval: self.poll_interval,
            },
        )
    }

    pub(super) fn sessions(&self) -> Result<SessionManager<dyn IdentityProvider>, Error> {
        self.identity
            .as_ref()
            .map(|provider| SessionManager::new(Arc::clone(provider)))
            .ok_or_else(|| {
                Error::service_unavailable(
                    "identity provider is not configured; set DCE_IDENTITY_API_KEY",
                )
            })
    }

    pub(super) fn profile_service(&self) -> UserProfileService<dyn UserProfileRepository> {
        UserProfileService::new(Arc::clone(&self.profiles))
    }

    pub(super) fn research_service(&self) -> ResearchProfileService<dyn ResearchProfileRepository> {
        ResearchProfileService::new(Arc::clone(&self.research))
    }

    pub(super) fn registration_service(
        &self,
    ) -> AlumniRegistrationService<
        dyn AlumniRegistrationRepository,
        dyn AlumniRegistrationSource,
        dyn UserProfileRepository,
    > {
        AlumniRegistrationService::new(
            AlumniRegistrationPorts {
                registrations: Arc::clone(&self.registrations),
                listings: Arc::clone(&self.listings),
                profiles: Arc::clone(&self.profiles),
            },
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn content_service(
        &self,
    ) -> AdminContentService<dyn ContentRepository, dyn UserProfileRepository> {
        AdminContentService::new(Arc::clone(&self.content), Arc::clone(&self.profiles))
    }
}
