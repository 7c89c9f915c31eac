//! Auth session manager.
//!
//! Owns the observable `{user, loading}` state and drives the identity
//! provider. There is no process-wide instance; callers construct one and
//! share it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AuthState, Credentials, Error, Session, SignUpRequest};

/// Session state holder over an [`IdentityProvider`].
pub struct SessionManager<P: ?Sized> {
    provider: Arc<P>,
    state: watch::Sender<AuthState>,
}

impl<P: ?Sized> SessionManager<P> {
    /// Create a manager in the loading state.
    pub fn new(provider: Arc<P>) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        Self { provider, state }
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Current identity, verified or not.
    pub fn current_user(&self) -> Option<Session> {
        self.state.borrow().user.clone()
    }

    fn publish(&self, user: Option<Session>) {
        self.state.send_replace(AuthState::settled(user));
    }
}

impl<P> SessionManager<P>
where
    P: IdentityProvider + ?Sized,
{
    /// Settle the initial state from a previously stored session.
    ///
    /// The stored session is re-read from the provider. A rejected token
    /// signs the user out; an unreachable provider keeps the stored
    /// session as-is.
    pub async fn restore(&self, stored: Option<Session>) -> AuthState {
        let Some(stored) = stored else {
            self.publish(None);
            return self.state();
        };
        match self.provider.lookup(&stored).await {
            Ok(session) => self.publish(Some(session)),
            Err(err @ (IdentityProviderError::SessionExpired
            | IdentityProviderError::InvalidCredentials)) => {
                warn!(uid = stored.uid(), error = %err, "stored session rejected");
                self.publish(None);
            }
            Err(err) => {
                warn!(uid = stored.uid(), error = %err, "could not refresh stored session");
                self.publish(Some(stored));
            }
        }
        self.state()
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, Error> {
        let session = self.provider.sign_in(credentials).await.map_err(|err| {
            warn!(email = %credentials.email(), error = %err, "sign-in failed");
            err.into_domain()
        })?;
        info!(uid = session.uid(), verified = session.email_verified(), "signed in");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    /// Create an account and send its verification mail.
    ///
    /// The new session is published before the mail is requested, so a
    /// failed send can be retried through [`Self::resend_verification`].
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, Error> {
        let email = request.credentials().email();
        let session = self.provider.sign_up(request).await.map_err(|err| {
            warn!(email = %email, error = %err, "sign-up failed");
            err.into_domain()
        })?;
        info!(uid = session.uid(), "account created");
        self.publish(Some(session.clone()));
        self.provider
            .send_verification(&session)
            .await
            .map_err(|err| {
                warn!(uid = session.uid(), error = %err, "verification mail not sent");
                err.into_domain()
            })?;
        Ok(session)
    }

    /// Re-read the current user to pick up a changed verification flag.
    pub async fn reload(&self) -> Result<Option<Session>, Error> {
        let Some(current) = self.current_user() else {
            return Ok(None);
        };
        match self.provider.lookup(&current).await {
            Ok(session) => {
                self.publish(Some(session.clone()));
                Ok(Some(session))
            }
            Err(err @ IdentityProviderError::SessionExpired) => {
                warn!(uid = current.uid(), "session expired during reload");
                self.publish(None);
                Err(err.into_domain())
            }
            Err(err) => Err(err.into_domain()),
        }
    }

    /// Send another verification mail to the retained, unverified identity.
    pub async fn resend_verification(&self) -> Result<(), Error> {
        let Some(session) = self.current_user() else {
            return Err(Error::unauthorized("no signed-in account to verify"));
        };
        if session.email_verified() {
            return Err(Error::invalid_request("email address is already verified"));
        }
        self.provider
            .send_verification(&session)
            .await
            .map_err(IdentityProviderError::into_domain)?;
        info!(uid = session.uid(), "verification mail re-sent");
        Ok(())
    }

    /// Sign out. Completes only after the provider has acknowledged.
    ///
    /// Local state is cleared even when the provider call fails; the
    /// failure is still returned.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let Some(session) = self.current_user() else {
            self.publish(None);
            return Ok(());
        };
        let outcome = self.provider.sign_out(&session).await;
        self.publish(None);
        match outcome {
            Ok(()) => {
                info!(uid = session.uid(), "signed out");
                Ok(())
            }
            Err(err) => {
                warn!(uid = session.uid(), error = %err, "provider sign-out failed");
                Err(err.into_domain())
            }
        }
    }
}
