//! Admin-managed events, news and committee members.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{ContentRepository, UserProfileRepository};
use crate::domain::profile_service::require_admin;
use crate::domain::{ContentDraft, ContentEntry, ContentKind, EmailAddress, Error};

/// Public listing plus admin-only edits of content collections.
pub struct AdminContentService<C: ?Sized, U: ?Sized> {
    content: Arc<C>,
    profiles: Arc<U>,
}

impl<C: ?Sized, U: ?Sized> AdminContentService<C, U> {
    /// Create the service.
    pub fn new(content: Arc<C>, profiles: Arc<U>) -> Self {
        Self { content, profiles }
    }
}

impl<C, U> AdminContentService<C, U>
where
    C: ContentRepository + ?Sized,
    U: UserProfileRepository + ?Sized,
{
    /// Everything in `kind`'s collection. Open to everyone.
    pub async fn list(&self, kind: ContentKind) -> Result<Vec<ContentEntry>, Error> {
        self.content
            .list(kind)
            .await
            .map_err(|err| err.into_domain(&format!("list {kind}")))
    }

    /// Create an entry. Admin only.
    pub async fn create(
        &self,
        actor: &EmailAddress,
        draft: &ContentDraft,
    ) -> Result<ContentEntry, Error> {
        require_admin(self.profiles.as_ref(), actor).await?;
        let kind = draft.kind();
        let created = self
            .content
            .create(draft)
            .await
            .map_err(|err| err.into_domain(&format!("create {kind}")))?;
        info!(actor = %actor, kind = %kind, id = %created.id, "content created");
        Ok(created)
    }

    /// Replace an entry's attributes. Admin only.
    pub async fn update(
        &self,
        actor: &EmailAddress,
        id: &str,
        draft: &ContentDraft,
    ) -> Result<ContentEntry, Error> {
        Self::require_id(id)?;
        require_admin(self.profiles.as_ref(), actor).await?;
        let kind = draft.kind();
        let updated = self
            .content
            .update(id, draft)
            .await
            .map_err(|err| err.into_domain(&format!("update {kind}")))?;
        info!(actor = %actor, kind = %kind, id, "content updated");
        Ok(updated)
    }

    /// Delete an entry. Admin only.
    pub async fn delete(
        &self,
        actor: &EmailAddress,
        kind: ContentKind,
        id: &str,
    ) -> Result<(), Error> {
        Self::require_id(id)?;
        require_admin(self.profiles.as_ref(), actor).await?;
        self.content
            .delete(kind, id)
            .await
            .map_err(|err| err.into_domain(&format!("delete {kind}")))?;
        info!(actor = %actor, kind = %kind, id, "content deleted");
        Ok(())
    }

    fn require_id(id: &str) -> Result<(), Error> {
        if id.trim().is_empty() {
            return Err(Error::invalid_request("content id is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Admin gating of content edits.
    use super::*;
    use crate::domain::ports::{BackendError, MockContentRepository, MockUserProfileRepository};
    use crate::domain::{ErrorCode, Role, UserProfile};
    use serde_json::{Map, Value, json};

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    fn profiles_with(role: Role) -> MockUserProfileRepository {
        let mut profiles = MockUserProfileRepository::new();
        profiles.expect_find().returning(move |who| {
            Ok(Some(UserProfile {
                role,
                ..UserProfile::new(who.clone(), "Editor")
            }))
        });
        profiles
    }

    fn attributes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn entry(id: &str, value: Value) -> ContentEntry {
        ContentEntry {
            id: id.to_owned(),
            attributes: attributes(value),
        }
    }

    #[tokio::test]
    async fn listing_needs_no_role() {
        let mut content = MockContentRepository::new();
        content
            .expect_list()
            .withf(|kind| *kind == ContentKind::News)
            .returning(|_| Ok(vec![entry("n1", json!({ "title": "Homecoming" }))]));
        let mut profiles = MockUserProfileRepository::new();
        profiles.expect_find().times(0);
        let service = AdminContentService::new(Arc::new(content), Arc::new(profiles));

        let news = service.list(ContentKind::News).await.expect("listed");
        assert_eq!(news[0].headline(ContentKind::News), Some("Homecoming"));
    }

    #[tokio::test]
    async fn admins_create_entries() {
        let draft = ContentDraft::new(
            ContentKind::CommitteeMember,
            attributes(json!({ "name": "Grace Hopper", "position": "Chair" })),
        )
        .expect("valid draft");
        let mut content = MockContentRepository::new();
        content
            .expect_create()
            .times(1)
            .returning(|sent| Ok(entry("c1", Value::Object(sent.attributes().clone()))));
        let service = AdminContentService::new(Arc::new(content), Arc::new(profiles_with(Role::Admin)));

        let created = service
            .create(&email("root@example.edu"), &draft)
            .await
            .expect("created");
        assert_eq!(created.id, "c1");
        assert_eq!(created.headline(ContentKind::CommitteeMember), Some("Grace Hopper"));
    }

    #[tokio::test]
    async fn members_cannot_edit() {
        let mut content = MockContentRepository::new();
        content.expect_delete().times(0);
        let service = AdminContentService::new(Arc::new(content), Arc::new(profiles_with(Role::User)));

        let error = service
            .delete(&email("ada@example.edu"), ContentKind::Event, "e1")
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(
            error.user_message("Delete failed"),
            "Administrator access required"
        );
    }

    #[tokio::test]
    async fn missing_entries_surface_not_found() {
        let draft = ContentDraft::new(ContentKind::Event, attributes(json!({ "title": "Gala" })))
            .expect("valid draft");
        let mut content = MockContentRepository::new();
        content
            .expect_update()
            .returning(|_, _| Err(BackendError::not_found("Event not found")));
        let service = AdminContentService::new(Arc::new(content), Arc::new(profiles_with(Role::Admin)));

        let error = service
            .update(&email("root@example.edu"), "e404", &draft)
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.user_message("Update failed"), "Event not found");
    }

    #[tokio::test]
    async fn blank_ids_are_rejected() {
        let service = AdminContentService::new(
            Arc::new(MockContentRepository::new()),
            Arc::new(MockUserProfileRepository::new()),
        );
        let error = service
            .delete(&email("root@example.edu"), ContentKind::News, " ")
            .await
            .expect_err("blank id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
