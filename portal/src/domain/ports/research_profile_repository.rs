//! Driven port for research profile persistence.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{EmailAddress, ResearchProfile};

/// A publication PDF ready to send.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicationPdf {
    /// Original file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PublicationPdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicationPdf")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Where the backend stored an uploaded PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPdf {
    /// Public URL of the file.
    pub pdf_url: String,
    /// File name as stored.
    pub file_name: String,
}

/// Port for loading and saving research profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResearchProfileRepository: Send + Sync {
    /// `GET /research-profiles/{email}`; `None` when no profile exists yet.
    async fn find(&self, email: &EmailAddress) -> Result<Option<ResearchProfile>, BackendError>;

    /// `PUT /research-profiles/{email}` with the full document.
    async fn save(&self, profile: &ResearchProfile) -> Result<ResearchProfile, BackendError>;

    /// `POST /research-profiles/{email}/upload-publication-pdf` (multipart).
    async fn upload_publication_pdf(
        &self,
        email: &EmailAddress,
        pdf: PublicationPdf,
    ) -> Result<StoredPdf, BackendError>;
}
