//! Reqwest-backed identity provider using the identity-toolkit REST API.
//!
//! Account endpoints are `POST {base}/accounts:{operation}?key={api_key}`
//! with JSON bodies. Failures carry `{"error": {"message": "CODE : detail"}}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, EmailAddress, Session, SignUpRequest};

/// Identity-toolkit adapter.
#[derive(Clone)]
pub struct IdentityToolkitProvider {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl IdentityToolkitProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, operation: &str) -> Result<Url, IdentityProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                IdentityProviderError::transport(format!(
                    "identity base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(&format!("accounts:{operation}"));
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call<B, T>(&self, operation: &str, payload: &B) -> Result<T, IdentityProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(operation)?;
        debug!(operation, "identity provider request");
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|error| IdentityProviderError::transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityProviderError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_error_body(body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            IdentityProviderError::decode(format!("invalid {operation} response: {error}"))
        })
    }

    async fn lookup_account(&self, id_token: &str) -> Result<AccountDto, IdentityProviderError> {
        let dto: LookupDto = self
            .call("lookup", &json!({ "idToken": id_token }))
            .await?;
        dto.users
            .into_iter()
            .next()
            .ok_or_else(IdentityProviderError::session_expired)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenDto {
    local_id: String,
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountDto {
    local_id: String,
    email: String,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct LookupDto {
    #[serde(default)]
    users: Vec<AccountDto>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeDto {
    error: ErrorDto,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    #[serde(default)]
    message: String,
}

fn parse_email(raw: &str) -> Result<EmailAddress, IdentityProviderError> {
    EmailAddress::new(raw)
        .map_err(|error| IdentityProviderError::decode(format!("provider email {raw:?}: {error}")))
}

fn session_from_token(dto: TokenDto, email_verified: bool) -> Result<Session, IdentityProviderError> {
    let session = Session::new(dto.local_id, parse_email(&dto.email)?, email_verified, dto.id_token);
    Ok(match dto.refresh_token {
        Some(token) => session.with_refresh_token(token),
        None => session,
    })
}

/// Map an error body onto the port's error taxonomy.
fn map_error_body(body: &[u8]) -> IdentityProviderError {
    let message = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let (code, detail) = match message.split_once(':') {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            IdentityProviderError::invalid_credentials()
        }
        "EMAIL_EXISTS" => IdentityProviderError::email_exists(),
        "WEAK_PASSWORD" => IdentityProviderError::weak_password(if detail.is_empty() {
            "password is too weak"
        } else {
            detail
        }),
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "USER_NOT_FOUND" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            IdentityProviderError::session_expired()
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityProviderError::too_many_attempts(),
        "" => IdentityProviderError::rejected("UNKNOWN"),
        other => IdentityProviderError::rejected(other),
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, IdentityProviderError> {
        let token: TokenDto = self
            .call(
                "signInWithPassword",
                &json!({
                    "email": credentials.email().as_ref(),
                    "password": credentials.password(),
                    "returnSecureToken": true,
                }),
            )
            .await?;
        let account = self.lookup_account(&token.id_token).await?;
        session_from_token(token, account.email_verified)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, IdentityProviderError> {
        let credentials = request.credentials();
        let token: TokenDto = self
            .call(
                "signUp",
                &json!({
                    "email": credentials.email().as_ref(),
                    "password": credentials.password(),
                    "displayName": request.name(),
                    "returnSecureToken": true,
                }),
            )
            .await?;
        session_from_token(token, false)
    }

    async fn lookup(&self, session: &Session) -> Result<Session, IdentityProviderError> {
        let account = self.lookup_account(session.id_token()).await?;
        let mut refreshed = Session::new(
            account.local_id,
            parse_email(&account.email)?,
            account.email_verified,
            session.id_token(),
        );
        if let Some(token) = session.refresh_token() {
            refreshed = refreshed.with_refresh_token(token);
        }
        Ok(refreshed)
    }

    async fn send_verification(&self, session: &Session) -> Result<(), IdentityProviderError> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &json!({ "requestType": "VERIFY_EMAIL", "idToken": session.id_token() }),
            )
            .await?;
        Ok(())
    }

    async fn sign_out(&self, session: &Session) -> Result<(), IdentityProviderError> {
        // Tokens are bearer-only; dropping them locally ends the session.
        debug!(uid = session.uid(), "identity session discarded");
        Ok(())
    }
}
