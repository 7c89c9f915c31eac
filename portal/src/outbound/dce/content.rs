//! Content collection port over `/events`, `/news` and `/committee-members`.

use async_trait::async_trait;
use reqwest::Method;

use super::client::DceHttpBackend;
use crate::domain::ports::{BackendError, ContentRepository};
use crate::domain::{ContentDraft, ContentEntry, ContentKind};

#[async_trait]
impl ContentRepository for DceHttpBackend {
    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentEntry>, BackendError> {
        self.get_json(&[kind.collection()]).await
    }

    async fn create(&self, draft: &ContentDraft) -> Result<ContentEntry, BackendError> {
        self.send_json(Method::POST, &[draft.kind().collection()], draft.attributes())
            .await
    }

    async fn update(&self, id: &str, draft: &ContentDraft) -> Result<ContentEntry, BackendError> {
        self.send_json(
            Method::PUT,
            &[draft.kind().collection(), id],
            draft.attributes(),
        )
        .await
    }

    async fn delete(&self, kind: ContentKind, id: &str) -> Result<(), BackendError> {
        self.execute(self.request(Method::DELETE, &[kind.collection(), id])?)
            .await
            .map(drop)
    }
}
