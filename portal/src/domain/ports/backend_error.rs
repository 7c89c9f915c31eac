//! Error shared by every port backed by `dce-server`.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors surfaced while calling the alumni backend.
    pub enum BackendError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "backend transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "backend timeout: {message}",
        /// The resource does not exist.
        NotFound { message: String } =>
            "backend resource not found: {message}",
        /// The caller is not allowed to perform the operation.
        Forbidden { message: String } =>
            "backend refused access: {message}",
        /// The backend rejected the request as conflicting with stored state.
        Conflict { message: String } =>
            "backend reported a conflict: {message}",
        /// Any other non-success status.
        Rejected { status: u16, message: String } =>
            "backend rejected request with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "backend response decode failed: {message}",
        /// The adapter refused the request before sending it.
        InvalidRequest { message: String } =>
            "backend request invalid: {message}",
    }
}

impl BackendError {
    /// Message the backend itself produced, for business failures.
    ///
    /// Transport-level failures return `None`; their text is diagnostic,
    /// not something to show a person.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::NotFound { message }
            | Self::Forbidden { message }
            | Self::Conflict { message }
            | Self::Rejected { message, .. } => Some(message.as_str()),
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. } => None,
        }
    }

    /// Map into the domain error taxonomy, keeping the server's message.
    pub fn into_domain(self, context: &str) -> Error {
        let server_message = self.server_message().map(str::to_owned);
        let diagnostic = format!("{context}: {self}");
        let error = match self {
            Self::Transport { .. } | Self::Timeout { .. } => Error::service_unavailable(diagnostic),
            Self::NotFound { .. } => Error::not_found(diagnostic),
            Self::Forbidden { .. } => Error::forbidden(diagnostic),
            Self::Conflict { .. } => Error::conflict(diagnostic),
            Self::Rejected { status, .. } if (400..500).contains(&status) => {
                Error::invalid_request(diagnostic)
            }
            Self::Rejected { .. } => Error::service_unavailable(diagnostic),
            Self::Decode { .. } => Error::internal(diagnostic),
            Self::InvalidRequest { .. } => Error::invalid_request(diagnostic),
        };
        error.with_server_message(server_message)
    }
}

#[cfg(test)]
mod tests {
    //! Domain mapping of backend failures.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case::transport(BackendError::transport("reset"), ErrorCode::ServiceUnavailable, None)]
    #[case::timeout(BackendError::timeout("slow"), ErrorCode::ServiceUnavailable, None)]
    #[case::missing(BackendError::not_found("no profile"), ErrorCode::NotFound, Some("no profile"))]
    #[case::conflict(BackendError::conflict("already registered"), ErrorCode::Conflict, Some("already registered"))]
    #[case::client(BackendError::rejected(422_u16, "bad year"), ErrorCode::InvalidRequest, Some("bad year"))]
    #[case::server(BackendError::rejected(502_u16, "upstream"), ErrorCode::ServiceUnavailable, Some("upstream"))]
    #[case::decode(BackendError::decode("eof"), ErrorCode::InternalError, None)]
    fn maps_into_domain_codes(
        #[case] error: BackendError,
        #[case] code: ErrorCode,
        #[case] server_message: Option<&str>,
    ) {
        let mapped = error.into_domain("load profile");
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.server_message(), server_message);
        assert!(mapped.message().starts_with("load profile: "));
    }
}
