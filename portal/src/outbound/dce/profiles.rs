//! Member and research profile ports over `/users` and `/research-profiles`.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use super::client::{DceHttpBackend, decode};
use super::dto::UploadPdfDto;
use crate::domain::ports::{
    BackendError, PublicationPdf, ResearchProfileRepository, StoredPdf, UserProfileRepository,
};
use crate::domain::{EmailAddress, ResearchProfile, Role, UserProfile};

const USERS: &str = "users";
const RESEARCH_PROFILES: &str = "research-profiles";
const PDF_FIELD: &str = "pdf";

#[async_trait]
impl UserProfileRepository for DceHttpBackend {
    async fn find(&self, email: &EmailAddress) -> Result<Option<UserProfile>, BackendError> {
        self.find_json(&[USERS, email.as_ref()]).await
    }

    async fn save(&self, profile: &UserProfile) -> Result<UserProfile, BackendError> {
        self.send_json(Method::PUT, &[USERS, profile.email.as_ref()], profile)
            .await
    }

    async fn set_role(&self, email: &EmailAddress, role: Role) -> Result<UserProfile, BackendError> {
        self.send_json(
            Method::PUT,
            &[USERS, email.as_ref(), "role"],
            &json!({ "role": role }),
        )
        .await
    }
}

#[async_trait]
impl ResearchProfileRepository for DceHttpBackend {
    async fn find(&self, email: &EmailAddress) -> Result<Option<ResearchProfile>, BackendError> {
        self.find_json(&[RESEARCH_PROFILES, email.as_ref()]).await
    }

    async fn save(&self, profile: &ResearchProfile) -> Result<ResearchProfile, BackendError> {
        self.send_json(
            Method::PUT,
            &[RESEARCH_PROFILES, profile.email().as_ref()],
            profile,
        )
        .await
    }

    async fn upload_publication_pdf(
        &self,
        email: &EmailAddress,
        pdf: PublicationPdf,
    ) -> Result<StoredPdf, BackendError> {
        let sent_name = pdf.file_name.clone();
        let part = Part::bytes(pdf.bytes)
            .file_name(pdf.file_name)
            .mime_str("application/pdf")
            .map_err(|error| BackendError::invalid_request(error.to_string()))?;
        let form = Form::new().part(PDF_FIELD, part);
        let request = self
            .request(
                Method::POST,
                &[RESEARCH_PROFILES, email.as_ref(), "upload-publication-pdf"],
            )?
            .multipart(form);
        let body = self.execute(request).await?;
        let dto: UploadPdfDto = decode(&body)?;
        dto.into_stored(&sent_name)
    }
}
