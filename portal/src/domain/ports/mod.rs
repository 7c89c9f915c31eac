//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod alumni_registration_repository;
mod alumni_registration_source;
mod alumni_status_query;
mod backend_error;
mod content_repository;
mod identity_provider;
mod research_profile_repository;
mod user_profile_repository;

#[cfg(test)]
pub use alumni_registration_repository::MockAlumniRegistrationRepository;
pub use alumni_registration_repository::{AlumniRegistrationRepository, RegistrationDecision};
#[cfg(test)]
pub use alumni_registration_source::MockAlumniRegistrationSource;
pub use alumni_registration_source::{AlumniRegistrationSource, FixtureAlumniRegistrationSource};
#[cfg(test)]
pub use alumni_status_query::MockAlumniStatusQuery;
pub use alumni_status_query::{AlumniStatusQuery, FixtureAlumniStatusQuery};
pub use backend_error::BackendError;
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::ContentRepository;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use research_profile_repository::MockResearchProfileRepository;
pub use research_profile_repository::{PublicationPdf, ResearchProfileRepository, StoredPdf};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::UserProfileRepository;
