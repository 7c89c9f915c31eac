//! Alumni registration records and status normalization.
//!
//! The backend reports a registration's state through three overlapping
//! signals (`status`, `approval`, `approvedAt`) and spells approval two
//! ways. [`RawRegistration::normalize`] folds them into one
//! [`AlumniStatus`] with a fixed precedence:
//!
//! 1. `status == "accepted"` reads as approved.
//! 2. `approval == true` reads as approved, `approval == false` as rejected.
//! 3. A recognised `status` string is kept.
//! 4. Anything else defaults to pending.
//! 5. A present `approvedAt` then forces approved, overriding 1-4.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EmailAddress;

/// Canonical registration status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlumniStatus {
    /// Submitted and awaiting an admin decision.
    Pending,
    /// Accepted by an admin.
    Approved,
    /// Declined by an admin.
    Rejected,
}

impl AlumniStatus {
    /// Wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AlumniStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the canonical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseAlumniStatusError;

impl fmt::Display for ParseAlumniStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid alumni status")
    }
}

impl std::error::Error for ParseAlumniStatusError {}

impl FromStr for AlumniStatus {
    type Err = ParseAlumniStatusError;

    /// Parse a status, accepting `accepted` as a synonym for `approved`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "accepted" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseAlumniStatusError),
        }
    }
}

/// Identity the resolver looks registrations up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlumniIdentity {
    /// Identity-provider uid (`firebaseUid` on backend records).
    pub uid: String,
    /// Signed-in email.
    pub email: EmailAddress,
}

impl AlumniIdentity {
    /// Build an identity from its parts.
    pub fn new(uid: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }

    /// Whether a backend record belongs to this identity.
    pub fn owns(&self, record: &RawRegistration) -> bool {
        let email_match = record
            .email
            .as_deref()
            .is_some_and(|email| self.email.matches(email));
        let uid_match = record
            .firebase_uid
            .as_deref()
            .is_some_and(|uid| !uid.is_empty() && uid == self.uid);
        email_match || uid_match
    }
}

/// A registration record as the backend sent it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RegistrationWire")]
pub struct RawRegistration {
    /// Backend document id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Owner identity-provider uid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    /// Applicant's name, when the listing includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw status string (`pending`, `accepted`, `approved`, `rejected`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Tri-state approval flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<bool>,
    /// Approval timestamp in whatever shape the backend used: an ISO
    /// string, epoch milliseconds, or a `{_seconds, _nanoseconds}` object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Value>,
}

/// Decoding shape for [`RawRegistration`]. Documents may carry both the
/// stored `_id` and a virtual `id`; the stored one wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationWire {
    #[serde(default, rename = "_id")]
    stored_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    firebase_uid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    approval: Option<bool>,
    #[serde(default)]
    approved_at: Option<Value>,
}

impl From<RegistrationWire> for RawRegistration {
    fn from(wire: RegistrationWire) -> Self {
        Self {
            id: wire.stored_id.or(wire.id),
            email: wire.email,
            firebase_uid: wire.firebase_uid,
            name: wire.name,
            status: wire.status,
            approval: wire.approval,
            approved_at: wire.approved_at,
        }
    }
}

impl RawRegistration {
    /// Record carrying only a status signal.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Fill a missing status with `status`, leaving other signals intact.
    #[must_use]
    pub fn or_status(mut self, status: AlumniStatus) -> Self {
        if self.status_text().is_none() {
            self.status = Some(status.as_str().to_owned());
        }
        self
    }

    fn status_text(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Whether `approvedAt` carries anything: null and blank strings do
    /// not count, any other value does.
    pub fn approved_at_present(&self) -> bool {
        match &self.approved_at {
            None | Some(Value::Null) => false,
            Some(Value::String(stamp)) => !stamp.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Collapse the record's signals into one status.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{AlumniStatus, RawRegistration};
    /// use serde_json::json;
    ///
    /// let accepted = RawRegistration::with_status("accepted");
    /// assert_eq!(accepted.normalize(), AlumniStatus::Approved);
    ///
    /// let stamped = RawRegistration {
    ///     approval: Some(false),
    ///     approved_at: Some(json!(1_704_067_200_000_i64)),
    ///     ..RawRegistration::with_status("pending")
    /// };
    /// assert_eq!(stamped.normalize(), AlumniStatus::Approved);
    /// ```
    pub fn normalize(&self) -> AlumniStatus {
        let status = self.status_text();
        let base = if status.is_some_and(|text| text.eq_ignore_ascii_case("accepted")) {
            AlumniStatus::Approved
        } else if self.approval == Some(true) {
            AlumniStatus::Approved
        } else if self.approval == Some(false) {
            AlumniStatus::Rejected
        } else {
            status
                .and_then(|text| text.parse().ok())
                .unwrap_or(AlumniStatus::Pending)
        };

        if self.approved_at_present() && base != AlumniStatus::Approved {
            return AlumniStatus::Approved;
        }
        base
    }
}

/// Validation errors for the alumni registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Name was blank.
    EmptyName,
    /// Department was blank.
    EmptyDepartment,
    /// Graduation year outside the accepted window.
    GraduationYearOutOfRange {
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },
    /// The uid was blank.
    EmptyUid,
}

impl RegistrationValidationError {
    /// Form field the error belongs to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyDepartment => "department",
            Self::GraduationYearOutOfRange { .. } => "graduationYear",
            Self::EmptyUid => "firebaseUid",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyDepartment => write!(f, "department must not be empty"),
            Self::GraduationYearOutOfRange { min, max } => {
                write!(f, "graduation year must be between {min} and {max}")
            }
            Self::EmptyUid => write!(f, "a signed-in account is required to register"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Earliest graduation year the form accepts.
pub const GRADUATION_YEAR_MIN: i32 = 1950;
/// How many years ahead of today a (future) graduation year may be.
pub const GRADUATION_YEAR_LOOKAHEAD: i32 = 6;

/// Alumni registration submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Applicant's full name.
    pub name: String,
    /// Applicant's email.
    pub email: EmailAddress,
    /// Identity-provider uid of the applicant.
    pub firebase_uid: String,
    /// Year of graduation.
    pub graduation_year: i32,
    /// Department graduated from.
    pub department: String,
    /// University student id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Current job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<String>,
    /// Current employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl RegistrationForm {
    /// Check required fields and the graduation-year window against `year_now`.
    pub fn validate_for_year(&self, year_now: i32) -> Result<(), RegistrationValidationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyName);
        }
        if self.firebase_uid.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyUid);
        }
        if self.department.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyDepartment);
        }
        let max = year_now + GRADUATION_YEAR_LOOKAHEAD;
        if !(GRADUATION_YEAR_MIN..=max).contains(&self.graduation_year) {
            return Err(RegistrationValidationError::GraduationYearOutOfRange {
                min: GRADUATION_YEAR_MIN,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
