//! Driven port for the third-party identity provider.
//!
//! Sign-in state lives with the provider; the client only holds the
//! session tokens it hands back.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Credentials, Error, Session, SignUpRequest};

define_port_error! {
    /// Errors surfaced by the identity provider.
    pub enum IdentityProviderError {
        /// Unknown email or wrong password.
        InvalidCredentials => "invalid email or password",
        /// Sign-up with an email that already has an account.
        EmailExists => "an account with this email already exists",
        /// The provider's password policy rejected the password.
        WeakPassword { message: String } =>
            "password rejected by identity provider: {message}",
        /// The session's token is no longer accepted.
        SessionExpired => "session expired, please sign in again",
        /// Too many attempts; the provider is throttling this account.
        TooManyAttempts => "too many attempts, try again later",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// Any other provider error code.
        Rejected { code: String } =>
            "identity provider rejected request: {code}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
    }
}

impl IdentityProviderError {
    /// Map into the domain error taxonomy.
    ///
    /// Account-level failures carry their text as the user-facing message;
    /// transport and decode failures fall back to the caller's generic text.
    pub fn into_domain(self) -> Error {
        let text = self.to_string();
        match self {
            Self::InvalidCredentials | Self::SessionExpired => {
                Error::unauthorized(text.clone()).with_server_message(Some(text))
            }
            Self::EmailExists => Error::conflict(text.clone()).with_server_message(Some(text)),
            Self::WeakPassword { .. } | Self::Rejected { .. } => {
                Error::invalid_request(text.clone()).with_server_message(Some(text))
            }
            Self::TooManyAttempts => {
                Error::service_unavailable(text.clone()).with_server_message(Some(text))
            }
            Self::Transport { .. } => Error::service_unavailable(text),
            Self::Decode { .. } => Error::internal(text),
        }
    }
}

/// Port for identity-provider account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, IdentityProviderError>;

    /// Create an account and return its (unverified) session.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, IdentityProviderError>;

    /// Re-read the account behind `session`, refreshing its verification flag.
    async fn lookup(&self, session: &Session) -> Result<Session, IdentityProviderError>;

    /// Ask the provider to send a verification email.
    async fn send_verification(&self, session: &Session) -> Result<(), IdentityProviderError>;

    /// End the session with the provider.
    async fn sign_out(&self, session: &Session) -> Result<(), IdentityProviderError>;
}
