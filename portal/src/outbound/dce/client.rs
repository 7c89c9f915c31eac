//! Reqwest-backed adapter for the `dce-server` REST API.
//!
//! This adapter owns transport details only: URL construction, timeouts,
//! HTTP error mapping and JSON decoding. Envelope unwrapping lives in `dto`.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::BackendError;

const DEFAULT_USER_AGENT: &str = "dce-portal/0.1";

/// Adapter implementing every backend port against one base URL.
#[derive(Clone)]
pub struct DceHttpBackend {
    client: Client,
    base_url: Url,
}

impl DceHttpBackend {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// API root this adapter talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded `segments` to the base URL.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                BackendError::invalid_request(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub(super) fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "dce-server request");
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Send and return the body of a successful response.
    pub(super) async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    pub(super) async fn get_json<T>(&self, segments: &[&str]) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(self.request(Method::GET, segments)?).await?;
        decode(&body)
    }

    /// Like [`Self::get_json`], with 404 read as "absent".
    pub(super) async fn find_json<T>(&self, segments: &[&str]) -> Result<Option<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        match self.get_json(segments).await {
            Ok(found) => Ok(Some(found)),
            Err(BackendError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, segments)?.json(payload);
        let body = self.execute(request).await?;
        decode(&body)
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(|error| {
        BackendError::decode(format!(
            "invalid dce-server JSON payload: {error}; body: {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::timeout(error.to_string())
    } else {
        BackendError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BackendError {
    let message = server_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            preview
        }
    });

    match status {
        StatusCode::NOT_FOUND => BackendError::not_found(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::forbidden(message),
        StatusCode::CONFLICT => BackendError::conflict(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BackendError::timeout(message)
        }
        _ => BackendError::rejected(status.as_u16(), message),
    }
}

/// The human-readable `message` (or `error`) field of an error body.
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .into_iter()
        .filter_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
