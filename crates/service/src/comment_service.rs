use std::sync::Arc;

use tracing::info;

use crate::domain::{Comment, NewComment};
use crate::errors::ServiceError;
use crate::store::{CommentStore, EventStore, UserStore};

/// Comments are anchored to an existing user and event. Existence is checked
/// against the stores directly rather than through the other services, to
/// avoid stacking validation layers.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventStore>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentStore>,
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self { comments, users, events }
    }

    /// Validation order is user-then-event: when both are missing, the user
    /// error wins. Nothing is persisted on failure.
    pub async fn create(
        &self,
        new: NewComment,
        user_id: i64,
        event_id: i64,
    ) -> Result<Comment, ServiceError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(format!("User does not exist {user_id}")))?;
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or_else(|| ServiceError::EventNotFound(format!("Event does not exist {event_id}")))?;
        let comment = self.comments.insert(new, user.id, event.id).await?;
        info!(comment_id = comment.id, user_id, event_id, "created comment");
        Ok(comment)
    }

    /// Empty result sets are not errors for the three relation lookups.
    pub async fn find_by_event_and_user(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Vec<Comment>, ServiceError> {
        self.comments.find_by_event_and_user(event_id, user_id).await
    }

    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<Comment>, ServiceError> {
        self.comments.find_by_event(event_id).await
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Comment>, ServiceError> {
        self.comments.find_by_user(user_id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Comment, ServiceError> {
        self.comments
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::CommentNotFound(format!("Comment does not exist {id}")))
    }

    /// Returns the pre-deletion snapshot.
    pub async fn delete(&self, id: i64) -> Result<Comment, ServiceError> {
        let comment = self.find_by_id(id).await?;
        self.comments.delete(id).await?;
        info!(comment_id = id, "deleted comment");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventDraft, NewUser, OrganizerDraft};
    use crate::store::memory::MemoryStore;
    use crate::{EventService, UserService};
    use chrono::NaiveDate;

    struct Fixture {
        comments: CommentService,
        users: UserService,
        events: EventService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            comments: CommentService::new(store.clone(), store.clone(), store.clone()),
            users: UserService::new(store.clone()),
            events: EventService::new(store),
        }
    }

    fn jack() -> NewUser {
        NewUser {
            password: "secret".into(),
            username: "jack".into(),
            email: "jack@example.com".into(),
        }
    }

    fn party() -> EventDraft {
        EventDraft {
            name: "Party".into(),
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            address: "Wroclaw".into(),
            organizer: OrganizerDraft {
                id: None,
                name: "acme".into(),
                email: "acme@example.com".into(),
            },
        }
    }

    fn hi() -> NewComment {
        NewComment { contents: "hi".into() }
    }

    #[tokio::test]
    async fn create_attaches_user_and_event() {
        let fx = fixture();
        let user = fx.users.create(jack()).await.unwrap();
        let event = fx.events.create(party()).await.unwrap();
        let comment = fx.comments.create(hi(), user.id, event.id).await.unwrap();
        assert_eq!(comment.contents, "hi");
        assert_eq!(comment.user_id, user.id);
        assert_eq!(comment.event_id, event.id);
    }

    #[tokio::test]
    async fn create_with_unknown_user_persists_nothing() {
        let fx = fixture();
        let event = fx.events.create(party()).await.unwrap();
        let err = fx.comments.create(hi(), 42, event.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
        assert!(fx.comments.find_by_event(event.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_checks_user_before_event() {
        let fx = fixture();
        // Both endpoints missing: the user error takes precedence.
        let err = fx.comments.create(hi(), 42, 99).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn create_with_unknown_event_fails() {
        let fx = fixture();
        let user = fx.users.create(jack()).await.unwrap();
        let err = fx.comments.create(hi(), user.id, 99).await.unwrap_err();
        assert!(matches!(err, ServiceError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn relation_lookups_return_empty_lists_not_errors() {
        let fx = fixture();
        assert!(fx.comments.find_by_event(1).await.unwrap().is_empty());
        assert!(fx.comments.find_by_user(1).await.unwrap().is_empty());
        assert!(fx.comments.find_by_event_and_user(1, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookups_filter_by_their_keys() {
        let fx = fixture();
        let jack = fx.users.create(jack()).await.unwrap();
        let john = fx
            .users
            .create(NewUser {
                password: "pw".into(),
                username: "john".into(),
                email: "john@example.com".into(),
            })
            .await
            .unwrap();
        let event = fx.events.create(party()).await.unwrap();
        fx.comments.create(hi(), jack.id, event.id).await.unwrap();
        fx.comments
            .create(NewComment { contents: "hello".into() }, john.id, event.id)
            .await
            .unwrap();

        assert_eq!(fx.comments.find_by_event(event.id).await.unwrap().len(), 2);
        assert_eq!(fx.comments.find_by_user(jack.id).await.unwrap().len(), 1);
        let both = fx
            .comments
            .find_by_event_and_user(event.id, john.id)
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].contents, "hello");
    }

    #[tokio::test]
    async fn find_by_id_fails_with_comment_kind() {
        let fx = fixture();
        let err = fx.comments.find_by_id(7).await.unwrap_err();
        assert!(matches!(err, ServiceError::CommentNotFound(_)));
    }

    #[tokio::test]
    async fn delete_returns_snapshot_then_not_found() {
        let fx = fixture();
        let user = fx.users.create(jack()).await.unwrap();
        let event = fx.events.create(party()).await.unwrap();
        let comment = fx.comments.create(hi(), user.id, event.id).await.unwrap();
        let snapshot = fx.comments.delete(comment.id).await.unwrap();
        assert_eq!(snapshot, comment);
        assert!(matches!(
            fx.comments.find_by_id(comment.id).await.unwrap_err(),
            ServiceError::CommentNotFound(_)
        ));
    }
}
