//! Authentication primitives: credentials, sessions and route access.
//!
//! Credential constructors validate raw form input before anything talks to
//! the identity provider, so validation failures stay next to the field
//! that caused them.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, EmailValidationError};

/// Minimum password length accepted by the identity provider.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Field-level validation errors for sign-in and sign-up forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The email field is blank or malformed.
    Email(EmailValidationError),
    /// The password field was blank.
    EmptyPassword,
    /// The password is shorter than [`PASSWORD_MIN_LENGTH`].
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },
    /// Sign-up confirmation does not match the password.
    PasswordMismatch,
    /// Sign-up display name was blank.
    EmptyName,
}

impl CredentialsValidationError {
    /// Form field the error belongs to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "confirmPassword",
            Self::EmptyName => "name",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<EmailValidationError> for CredentialsValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::Email(value)
    }
}

/// Validated sign-in credentials.
///
/// # Examples
/// ```
/// use portal::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("ada@example.edu", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.edu");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email the user signs in with.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    name: String,
    credentials: Credentials,
}

impl SignUpRequest {
    /// Validate a sign-up form, enforcing the password policy.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        let credentials = Credentials::try_from_parts(email, password)?;
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        if password != confirm_password {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: name.to_owned(),
            credentials,
        })
    }

    /// Display name to attach to the new account.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credentials for the new account.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// An identity-provider session.
///
/// The id token is kept in a zeroizing buffer and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    uid: String,
    email: EmailAddress,
    email_verified: bool,
    id_token: Zeroizing<String>,
    refresh_token: Option<Zeroizing<String>>,
}

impl Session {
    /// Build a session from provider output.
    pub fn new(
        uid: impl Into<String>,
        email: EmailAddress,
        email_verified: bool,
        id_token: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            email,
            email_verified,
            id_token: Zeroizing::new(id_token.into()),
            refresh_token: None,
        }
    }

    /// Attach the provider's refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Return a copy with the verification flag replaced.
    #[must_use]
    pub fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = verified;
        self
    }

    /// Provider user id (the backend's `firebaseUid`).
    pub fn uid(&self) -> &str {
        self.uid.as_str()
    }

    /// Signed-in email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Whether the provider reports the email as verified.
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Bearer token for provider calls.
    pub fn id_token(&self) -> &str {
        self.id_token.as_str()
    }

    /// Refresh token, if the provider issued one.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|token| token.as_str())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("email_verified", &self.email_verified)
            .finish_non_exhaustive()
    }
}

/// What a route guard should do with the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// The provider has not reported yet; show a spinner.
    Loading,
    /// Nobody is signed in.
    SignedOut,
    /// Signed in but unverified. Guards treat this as signed out; the
    /// identity is kept so the user can ask for another verification mail.
    Unverified(Session),
    /// Signed in with a verified email.
    Verified(Session),
}

impl RouteAccess {
    /// Whether protected routes may render.
    pub fn is_authorised(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

/// Observable auth state: `{user, loading}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// Current identity, verified or not.
    pub user: Option<Session>,
    /// True until the first provider report arrives.
    pub loading: bool,
}

impl AuthState {
    /// State before the provider has reported anything.
    pub const fn initial() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    /// Settled state for the given identity.
    pub const fn settled(user: Option<Session>) -> Self {
        Self {
            user,
            loading: false,
        }
    }

    /// Classify the state for route guards.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{AuthState, EmailAddress, RouteAccess, Session};
    ///
    /// let email = EmailAddress::new("ada@example.edu").unwrap();
    /// let session = Session::new("uid-1", email, false, "token");
    /// let access = AuthState::settled(Some(session)).route_access();
    /// assert!(matches!(access, RouteAccess::Unverified(_)));
    /// assert!(!access.is_authorised());
    /// ```
    pub fn route_access(&self) -> RouteAccess {
        if self.loading {
            return RouteAccess::Loading;
        }
        match &self.user {
            None => RouteAccess::SignedOut,
            Some(session) if session.email_verified() => RouteAccess::Verified(session.clone()),
            Some(session) => RouteAccess::Unverified(session.clone()),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}
