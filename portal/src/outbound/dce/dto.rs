//! Wire envelopes used by `dce-server`.
//!
//! Each registration endpoint wraps the same record differently. These DTOs
//! unwrap them into an optional [`RawRegistration`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::RawRegistration;
use crate::domain::ports::{BackendError, StoredPdf};

/// `GET /alumni-registration/status-by-uid/{uid}`.
#[derive(Debug, Deserialize)]
pub(super) struct StatusByUidDto {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    registration: Option<RawRegistration>,
}

impl StatusByUidDto {
    pub(super) fn into_record(self) -> Option<RawRegistration> {
        self.registration.filter(|_| self.success)
    }
}

/// `GET /alumni-registration/check-by-uid/{uid}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckByUidDto {
    #[serde(default)]
    has_submitted: bool,
    #[serde(default)]
    submission: Option<RawRegistration>,
}

impl CheckByUidDto {
    pub(super) fn into_record(self) -> Option<RawRegistration> {
        self.submission.filter(|_| self.has_submitted)
    }
}

/// `GET /alumni-registration/status/{email}`: either a bare JSON string or
/// an object with a flat `status` (and possibly the other signals).
pub(super) fn status_by_email_record(body: Value) -> Result<Option<RawRegistration>, BackendError> {
    match body {
        Value::String(status) if status.trim().is_empty() => Ok(None),
        Value::String(status) => Ok(Some(RawRegistration::with_status(status))),
        Value::Null => Ok(None),
        Value::Object(_) => {
            let record: RawRegistration = serde_json::from_value(body).map_err(|error| {
                BackendError::decode(format!("invalid status payload: {error}"))
            })?;
            let has_signal = record.status.as_deref().is_some_and(|s| !s.trim().is_empty())
                || record.approval.is_some()
                || record.approved_at_present();
            Ok(has_signal.then_some(record))
        }
        other => Err(BackendError::decode(format!(
            "unexpected status payload: {other}"
        ))),
    }
}

/// Listing endpoints answer with a bare array or `{registrations: [...]}`.
///
/// Entries are decoded one at a time; a malformed entry is skipped so the
/// rest of the listing can still be scanned.
pub(super) fn registration_list(body: Value) -> Result<Vec<RawRegistration>, BackendError> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut wrapper) => match wrapper.remove("registrations") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(BackendError::decode(
                    "listing object has no registrations array",
                ));
            }
        },
        other => {
            return Err(BackendError::decode(format!(
                "unexpected listing payload: {other}"
            )));
        }
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            serde_json::from_value::<RawRegistration>(entry)
                .inspect_err(|error| {
                    debug!(position, error = %error, "skipping malformed registration entry");
                })
                .ok()
        })
        .collect())
}

/// Write endpoints answer with `{success, registration}` or the bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RegistrationEnvelopeDto {
    Wrapped { registration: RawRegistration },
    Plain(RawRegistration),
}

impl RegistrationEnvelopeDto {
    pub(super) fn into_record(self) -> RawRegistration {
        match self {
            Self::Wrapped { registration } | Self::Plain(registration) => registration,
        }
    }
}

/// `POST /research-profiles/{email}/upload-publication-pdf`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadPdfDto {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    pdf_url: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl UploadPdfDto {
    pub(super) fn into_stored(self, sent_name: &str) -> Result<StoredPdf, BackendError> {
        if !self.success {
            return Err(BackendError::rejected(
                200_u16,
                self.message.unwrap_or_else(|| "upload was not accepted".to_owned()),
            ));
        }
        let pdf_url = self
            .pdf_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| BackendError::decode("upload response is missing pdfUrl"))?;
        Ok(StoredPdf {
            pdf_url,
            file_name: self.file_name.unwrap_or_else(|| sent_name.to_owned()),
        })
    }
}
