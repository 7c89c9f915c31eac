//! Driven port for admin-managed content collections.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{ContentDraft, ContentEntry, ContentKind};

/// Port for the events, news and committee collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// `GET /{collection}`.
    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentEntry>, BackendError>;

    /// `POST /{collection}`.
    async fn create(&self, draft: &ContentDraft) -> Result<ContentEntry, BackendError>;

    /// `PUT /{collection}/{id}`.
    async fn update(&self, id: &str, draft: &ContentDraft) -> Result<ContentEntry, BackendError>;

    /// `DELETE /{collection}/{id}`.
    async fn delete(&self, kind: ContentKind, id: &str) -> Result<(), BackendError>;
}
