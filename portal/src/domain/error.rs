//! The error every service returns.
//!
//! Port failures are translated here, so front ends only deal with an
//! [`ErrorCode`], a diagnostic message and, for business failures, the text
//! the backend wants shown.

use std::fmt;

use serde_json::Value;

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Input failed validation before anything was sent.
    InvalidRequest,
    /// No usable session.
    Unauthorized,
    /// Signed in, but lacking the role the operation needs.
    Forbidden,
    /// Nothing stored under the given key.
    NotFound,
    /// Clashes with stored state, e.g. a second registration.
    Conflict,
    /// `dce-server` or the identity provider could not be reached.
    ServiceUnavailable,
    /// A bug or an unexpected response.
    InternalError,
}

impl ErrorCode {
    /// Snake-case label, e.g. `"not_found"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blank diagnostic message was supplied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// Message was empty after trimming.
    #[error("error message must not be blank")]
    EmptyMessage,
}

/// Service failure.
///
/// The diagnostic message is never blank.
///
/// ```
/// use portal::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("no research profile");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    server_message: Option<String>,
    details: Option<Value>,
}

macro_rules! code_constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Error with [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// # Panics
    ///
    /// Panics on a blank `message`; every call site passes literal or
    /// formatted text.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|err| panic!("invalid {code} error: {err}"))
    }

    /// Like [`Error::new`] but reports a blank message instead of panicking.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            server_message: None,
            details: None,
        })
    }

    code_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic text for logs.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// What the backend said, if it explained itself.
    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// Structured context, e.g. `{"field": "email"}`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Record the backend's explanation. Blank text is dropped.
    pub fn with_server_message(mut self, message: Option<String>) -> Self {
        self.server_message = message.filter(|text| !text.trim().is_empty());
        self
    }

    /// Attach structured context.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The backend's message when there is one, otherwise `fallback`.
    ///
    /// ```
    /// use portal::domain::Error;
    ///
    /// let err = Error::conflict("duplicate registration")
    ///     .with_server_message(Some("You have already applied".to_owned()));
    /// assert_eq!(err.user_message("Something went wrong"), "You have already applied");
    /// assert_eq!(Error::internal("boom").user_message("Something went wrong"), "Something went wrong");
    /// ```
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
