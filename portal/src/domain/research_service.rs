//! Research profile service.
//!
//! Every edit is load, mutate, save: the backend stores the whole document
//! and the client always sends it back with freshly computed metrics.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{BackendError, PublicationPdf, ResearchProfileRepository};
use crate::domain::{
    Achievement, EmailAddress, EntryIndexError, Error, PUBLICATION_PDF_MAX_BYTES, Publication,
    ResearchProfile, ResearchProject,
};

/// Reasons a file is refused before upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PdfValidationError {
    /// Zero-byte file.
    #[error("file is empty")]
    Empty,
    /// Larger than [`PUBLICATION_PDF_MAX_BYTES`].
    #[error("file is {size} bytes; the limit is {max} bytes")]
    TooLarge {
        /// Actual size.
        size: u64,
        /// Limit.
        max: u64,
    },
    /// Name or content is not a PDF.
    #[error("only PDF files are accepted")]
    NotPdf,
}

/// Check that `pdf` is an acceptable publication PDF.
///
/// # Examples
/// ```
/// use portal::domain::ports::PublicationPdf;
/// use portal::domain::{PdfValidationError, validate_publication_pdf};
///
/// let pdf = PublicationPdf { file_name: "paper.pdf".into(), bytes: b"%PDF-1.7\n".to_vec() };
/// assert_eq!(validate_publication_pdf(&pdf), Ok(()));
///
/// let text = PublicationPdf { file_name: "notes.txt".into(), bytes: b"hello".to_vec() };
/// assert_eq!(validate_publication_pdf(&text), Err(PdfValidationError::NotPdf));
/// ```
pub fn validate_publication_pdf(pdf: &PublicationPdf) -> Result<(), PdfValidationError> {
    let size = u64::try_from(pdf.bytes.len()).unwrap_or(u64::MAX);
    if size == 0 {
        return Err(PdfValidationError::Empty);
    }
    if size > PUBLICATION_PDF_MAX_BYTES {
        return Err(PdfValidationError::TooLarge {
            size,
            max: PUBLICATION_PDF_MAX_BYTES,
        });
    }
    let named_pdf = pdf
        .file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
    if !named_pdf || !pdf.bytes.starts_with(b"%PDF-") {
        return Err(PdfValidationError::NotPdf);
    }
    Ok(())
}

fn index_error(err: EntryIndexError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "index": err.index,
        "len": err.len,
    }))
}

/// Research profile use-cases over a [`ResearchProfileRepository`].
pub struct ResearchProfileService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for ResearchProfileService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ?Sized> ResearchProfileService<R> {
    /// Create the service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> ResearchProfileService<R>
where
    R: ResearchProfileRepository + ?Sized,
{
    /// Load a profile; a researcher without one gets an empty profile.
    pub async fn load(&self, email: &EmailAddress) -> Result<ResearchProfile, Error> {
        match self.repository.find(email).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) | Err(BackendError::NotFound { .. }) => {
                Ok(ResearchProfile::empty(email.clone()))
            }
            Err(err) => Err(err.into_domain("load research profile")),
        }
    }

    /// Save a profile with freshly computed metrics.
    pub async fn save(&self, mut profile: ResearchProfile) -> Result<ResearchProfile, Error> {
        profile.sync_metrics();
        let saved = self.repository.save(&profile).await.map_err(|err| {
            warn!(
                email = %profile.email(),
                kind = err.kind(),
                error = %err,
                "research profile save failed"
            );
            err.into_domain("save research profile")
        })?;
        info!(
            email = %saved.email(),
            publications = saved.total_publications(),
            citations = saved.total_citations(),
            "research profile saved"
        );
        Ok(saved)
    }

    async fn edit<F>(&self, email: &EmailAddress, change: F) -> Result<ResearchProfile, Error>
    where
        F: FnOnce(&mut ResearchProfile) -> Result<(), Error> + Send,
    {
        let mut profile = self.load(email).await?;
        change(&mut profile)?;
        self.save(profile).await
    }

    /// Append a publication.
    pub async fn add_publication(
        &self,
        email: &EmailAddress,
        publication: Publication,
    ) -> Result<ResearchProfile, Error> {
        if publication.title.trim().is_empty() {
            return Err(Error::invalid_request("publication title is required")
                .with_details(json!({ "field": "title" })));
        }
        self.edit(email, |profile| {
            profile.add_publication(publication);
            Ok(())
        })
        .await
    }

    /// Replace the publication at `index`.
    pub async fn update_publication(
        &self,
        email: &EmailAddress,
        index: usize,
        publication: Publication,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile
                .update_publication(index, publication)
                .map_err(index_error)
        })
        .await
    }

    /// Remove the publication at `index`.
    pub async fn remove_publication(
        &self,
        email: &EmailAddress,
        index: usize,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile
                .remove_publication(index)
                .map(drop)
                .map_err(index_error)
        })
        .await
    }

    /// Add a research area unless already listed.
    pub async fn add_research_area(
        &self,
        email: &EmailAddress,
        area: &str,
    ) -> Result<ResearchProfile, Error> {
        if area.trim().is_empty() {
            return Err(Error::invalid_request("research area is required"));
        }
        self.edit(email, |profile| {
            profile.add_research_area(area);
            Ok(())
        })
        .await
    }

    /// Remove a research area.
    pub async fn remove_research_area(
        &self,
        email: &EmailAddress,
        area: &str,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile.remove_research_area(area);
            Ok(())
        })
        .await
    }

    /// Append an ongoing project.
    pub async fn add_project(
        &self,
        email: &EmailAddress,
        project: ResearchProject,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile.add_project(project);
            Ok(())
        })
        .await
    }

    /// Remove the project at `index`.
    pub async fn remove_project(
        &self,
        email: &EmailAddress,
        index: usize,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile.remove_project(index).map(drop).map_err(index_error)
        })
        .await
    }

    /// Append an achievement.
    pub async fn add_achievement(
        &self,
        email: &EmailAddress,
        achievement: Achievement,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile.add_achievement(achievement);
            Ok(())
        })
        .await
    }

    /// Remove the achievement at `index`.
    pub async fn remove_achievement(
        &self,
        email: &EmailAddress,
        index: usize,
    ) -> Result<ResearchProfile, Error> {
        self.edit(email, |profile| {
            profile
                .remove_achievement(index)
                .map(drop)
                .map_err(index_error)
        })
        .await
    }

    /// Upload a PDF and attach it to the publication at `index`.
    pub async fn upload_publication_pdf(
        &self,
        email: &EmailAddress,
        index: usize,
        pdf: PublicationPdf,
    ) -> Result<ResearchProfile, Error> {
        validate_publication_pdf(&pdf).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "pdf" }))
        })?;
        let mut profile = self.load(email).await?;
        let len = profile.publications().len();
        if index >= len {
            return Err(index_error(EntryIndexError { index, len }));
        }
        let stored = self
            .repository
            .upload_publication_pdf(email, pdf)
            .await
            .map_err(|err| err.into_domain("upload publication pdf"))?;
        info!(email = %email, index, file = %stored.file_name, "publication pdf uploaded");
        profile
            .attach_pdf(index, stored.pdf_url, stored.file_name)
            .map_err(index_error)?;
        self.save(profile).await
    }
}
