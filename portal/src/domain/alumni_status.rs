//! Alumni status resolution across the backend's registration endpoints.
//!
//! The backend can answer "what is this user's registration status?"
//! through five endpoints, none of which is reliable on its own. The
//! resolver tries them in a fixed order and keeps the first answer it
//! gets. A source that fails or has nothing to say is skipped; running out
//! of sources means the user has not registered.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{AlumniRegistrationSource, AlumniStatusQuery, BackendError};
use crate::domain::{AlumniIdentity, AlumniStatus, RawRegistration};

/// One way of asking the backend for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSource {
    /// `status-by-uid/{uid}`.
    StatusByUid,
    /// `check-by-uid/{uid}`.
    CheckByUid,
    /// `status/{email}`.
    StatusByEmail,
    /// Scan of the approved listing.
    ApprovedList,
    /// Scan of the pending listing.
    PendingList,
}

impl StatusSource {
    /// Consultation order used unless a caller overrides it.
    pub const DEFAULT_ORDER: [Self; 5] = [
        Self::StatusByUid,
        Self::CheckByUid,
        Self::StatusByEmail,
        Self::ApprovedList,
        Self::PendingList,
    ];

    /// Stable label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StatusByUid => "status_by_uid",
            Self::CheckByUid => "check_by_uid",
            Self::StatusByEmail => "status_by_email",
            Self::ApprovedList => "approved_list",
            Self::PendingList => "pending_list",
        }
    }

    const fn needs_uid(self) -> bool {
        matches!(self, Self::StatusByUid | Self::CheckByUid)
    }

    /// Ask this source about `identity`.
    ///
    /// Listing scans take the first record the identity owns and fill a
    /// missing status from the listing it came from.
    pub async fn ask<S>(
        self,
        source: &S,
        identity: &AlumniIdentity,
    ) -> Result<Option<RawRegistration>, BackendError>
    where
        S: AlumniRegistrationSource + ?Sized,
    {
        match self {
            Self::StatusByUid => source.status_by_uid(&identity.uid).await,
            Self::CheckByUid => source.check_by_uid(&identity.uid).await,
            Self::StatusByEmail => source.status_by_email(&identity.email).await,
            Self::ApprovedList => Ok(first_owned(
                source.list_approved().await?,
                identity,
                AlumniStatus::Approved,
            )),
            Self::PendingList => Ok(first_owned(
                source.list_pending().await?,
                identity,
                AlumniStatus::Pending,
            )),
        }
    }
}

impl fmt::Display for StatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn first_owned(
    records: Vec<RawRegistration>,
    identity: &AlumniIdentity,
    listed_as: AlumniStatus,
) -> Option<RawRegistration> {
    records
        .into_iter()
        .find(|record| identity.owns(record))
        .map(|record| record.or_status(listed_as))
}

/// Sequential, first-answer-wins resolver over an [`AlumniRegistrationSource`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use portal::domain::ports::FixtureAlumniRegistrationSource;
/// use portal::domain::{AlumniIdentity, AlumniStatusResolver, EmailAddress};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let resolver = AlumniStatusResolver::new(Arc::new(FixtureAlumniRegistrationSource));
/// let identity = AlumniIdentity::new("uid-1", EmailAddress::new("ada@example.edu").unwrap());
/// assert_eq!(resolver.resolve(&identity).await, None);
/// # });
/// ```
pub struct AlumniStatusResolver<S: ?Sized> {
    source: Arc<S>,
    order: Vec<StatusSource>,
}

impl<S: ?Sized> Clone for AlumniStatusResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            order: self.order.clone(),
        }
    }
}

impl<S: ?Sized> AlumniStatusResolver<S> {
    /// Resolver consulting [`StatusSource::DEFAULT_ORDER`].
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            order: StatusSource::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Replace the consultation order.
    #[must_use]
    pub fn with_sources(mut self, order: impl IntoIterator<Item = StatusSource>) -> Self {
        self.order = order.into_iter().collect();
        self
    }

    /// Consultation order in effect.
    pub fn sources(&self) -> &[StatusSource] {
        &self.order
    }
}

impl<S> AlumniStatusResolver<S>
where
    S: AlumniRegistrationSource + ?Sized,
{
    /// Resolve `identity` to a normalized status.
    ///
    /// Sources run one after another, never concurrently. `None` means no
    /// source produced a record.
    pub async fn resolve(&self, identity: &AlumniIdentity) -> Option<AlumniStatus> {
        for &source in &self.order {
            if source.needs_uid() && identity.uid.trim().is_empty() {
                continue;
            }
            match source.ask(self.source.as_ref(), identity).await {
                Ok(Some(record)) => {
                    let status = record.normalize();
                    debug!(source = source.label(), status = %status, "alumni status resolved");
                    return Some(status);
                }
                Ok(None) => {
                    debug!(source = source.label(), "alumni status source had no record");
                }
                Err(err) => {
                    debug!(
                        source = source.label(),
                        kind = err.kind(),
                        error = %err,
                        "alumni status source failed; trying next"
                    );
                }
            }
        }
        debug!(email = %identity.email, "no alumni registration found");
        None
    }
}

#[async_trait]
impl<S> AlumniStatusQuery for AlumniStatusResolver<S>
where
    S: AlumniRegistrationSource + ?Sized,
{
    async fn resolve(&self, identity: &AlumniIdentity) -> Option<AlumniStatus> {
        Self::resolve(self, identity).await
    }
}

#[cfg(test)]
mod tests;
