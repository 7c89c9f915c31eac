//! Alumni registration ports over `/alumni-registration`.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::client::DceHttpBackend;
use super::dto::{
    CheckByUidDto, RegistrationEnvelopeDto, StatusByUidDto, registration_list,
    status_by_email_record,
};
use crate::domain::ports::{
    AlumniRegistrationRepository, AlumniRegistrationSource, BackendError, RegistrationDecision,
};
use crate::domain::{EmailAddress, RawRegistration, RegistrationForm};

const COLLECTION: &str = "alumni-registration";

#[async_trait]
impl AlumniRegistrationSource for DceHttpBackend {
    async fn status_by_uid(&self, uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        let dto: StatusByUidDto = self.get_json(&[COLLECTION, "status-by-uid", uid]).await?;
        Ok(dto.into_record())
    }

    async fn check_by_uid(&self, uid: &str) -> Result<Option<RawRegistration>, BackendError> {
        let dto: CheckByUidDto = self.get_json(&[COLLECTION, "check-by-uid", uid]).await?;
        Ok(dto.into_record())
    }

    async fn status_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<RawRegistration>, BackendError> {
        let body: Value = self
            .get_json(&[COLLECTION, "status", email.as_ref()])
            .await?;
        status_by_email_record(body)
    }

    async fn list_approved(&self) -> Result<Vec<RawRegistration>, BackendError> {
        let body: Value = self.get_json(&[COLLECTION, "approved"]).await?;
        registration_list(body)
    }

    async fn list_pending(&self) -> Result<Vec<RawRegistration>, BackendError> {
        let body: Value = self.get_json(&[COLLECTION, "pending"]).await?;
        registration_list(body)
    }
}

#[async_trait]
impl AlumniRegistrationRepository for DceHttpBackend {
    async fn submit(&self, form: &RegistrationForm) -> Result<RawRegistration, BackendError> {
        let dto: RegistrationEnvelopeDto = self.send_json(Method::POST, &[COLLECTION], form).await?;
        Ok(dto.into_record())
    }

    async fn decide(
        &self,
        registration_id: &str,
        decision: RegistrationDecision,
    ) -> Result<RawRegistration, BackendError> {
        let segments = [COLLECTION, registration_id, decision.path_segment()];
        let body = self.execute(self.request(Method::PUT, &segments)?).await?;
        let dto: RegistrationEnvelopeDto = super::client::decode(&body)?;
        Ok(dto.into_record())
    }
}
