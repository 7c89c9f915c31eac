//! Domain primitives, ports and services.
//!
//! Purpose: model the alumni portal's data and use-cases without any
//! transport concerns. Adapters in `outbound` implement the ports declared
//! in [`ports`]; the CLI in `inbound` drives the services.
//!
//! Public surface:
//! - Error / ErrorCode: failure taxonomy shared by every service.
//! - AlumniStatusResolver / StatusMonitor: registration status lookup and
//!   background refresh.
//! - ResearchProfile and ResearchProfileService: research metrics kept in
//!   sync with the publication list.
//! - SessionManager: observable auth state over the identity provider.

pub mod alumni;
pub mod alumni_status;
pub mod auth;
pub mod content;
pub mod content_service;
pub mod email;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod registration_service;
pub mod research;
pub mod research_service;
pub mod session;
pub mod status_monitor;

pub use self::alumni::{
    AlumniIdentity, AlumniStatus, GRADUATION_YEAR_LOOKAHEAD, GRADUATION_YEAR_MIN,
    ParseAlumniStatusError, RawRegistration, RegistrationForm, RegistrationValidationError,
};
pub use self::alumni_status::{AlumniStatusResolver, StatusSource};
pub use self::auth::{
    AuthState, Credentials, CredentialsValidationError, PASSWORD_MIN_LENGTH, RouteAccess, Session,
    SignUpRequest,
};
pub use self::content::{
    ContentDraft, ContentEntry, ContentKind, ContentValidationError, ParseContentKindError,
};
pub use self::content_service::AdminContentService;
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::{Education, ParseRoleError, Role, UserProfile, WorkExperience};
pub use self::profile_service::UserProfileService;
pub use self::registration_service::{AlumniRegistrationPorts, AlumniRegistrationService};
pub use self::research::{
    Achievement, EntryIndexError, PUBLICATION_PDF_MAX_BYTES, Publication, ResearchProfile,
    ResearchProject, citation_count,
};
pub use self::research_service::{
    PdfValidationError, ResearchProfileService, validate_publication_pdf,
};
pub use self::session::SessionManager;
pub use self::status_monitor::{
    DEFAULT_POLL_INTERVAL, StatusMonitor, StatusMonitorConfig, StatusMonitorHandle,
    StatusSnapshot,
};

/// Convenient result alias for service operations.
pub type PortalResult<T> = Result<T, Error>;
