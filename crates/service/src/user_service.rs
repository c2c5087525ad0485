use std::sync::Arc;

use tracing::info;

use crate::domain::{NewUser, User};
use crate::errors::ServiceError;
use crate::store::UserStore;

/// CRUD plus username lookup over user records.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        self.store.list().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(format!("User not found {id}")))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Vec<User>, ServiceError> {
        let users = self.store.find_by_username(username).await?;
        if users.is_empty() {
            return Err(ServiceError::UserNotFound(format!(
                "User {username} does not exist"
            )));
        }
        Ok(users)
    }

    pub async fn create(&self, new: NewUser) -> Result<User, ServiceError> {
        let user = self.store.insert(new).await?;
        info!(user_id = user.id, "created user");
        Ok(user)
    }

    /// Copies username and email onto the stored record; password and id are
    /// immutable through this path.
    pub async fn update(&self, changes: NewUser, id: i64) -> Result<User, ServiceError> {
        let mut user = self.find_by_id(id).await?;
        user.username = changes.username;
        user.email = changes.email;
        self.store.save(&user).await
    }

    /// Returns the pre-deletion snapshot.
    pub async fn delete(&self, id: i64) -> Result<User, ServiceError> {
        let user = self.find_by_id(id).await?;
        self.store.delete(id).await?;
        info!(user_id = id, "deleted user");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn jack() -> NewUser {
        NewUser {
            password: "secret".into(),
            username: "jack".into(),
            email: "jack@example.com".into(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_round_trips() {
        let svc = service();
        let created = svc.create(jack()).await.unwrap();
        let found = svc.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.username, "jack");
    }

    #[tokio::test]
    async fn find_by_id_fails_for_unknown_user() {
        let svc = service();
        let err = svc.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn find_by_username_fails_on_empty_match() {
        let svc = service();
        svc.create(jack()).await.unwrap();
        assert_eq!(svc.find_by_username("jack").await.unwrap().len(), 1);
        let err = svc.find_by_username("john").await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn update_copies_only_username_and_email() {
        let svc = service();
        let created = svc.create(jack()).await.unwrap();
        let updated = svc
            .update(
                NewUser {
                    password: "ignored".into(),
                    username: "john".into(),
                    email: "john@example.com".into(),
                },
                created.id,
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, "john");
        assert_eq!(updated.email, "john@example.com");
        // Password is immutable through update.
        assert_eq!(updated.password, "secret");
    }

    #[tokio::test]
    async fn update_on_unknown_id_fails_without_writing() {
        let svc = service();
        let err = svc.update(jack(), 42).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
        assert!(svc.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_snapshot_and_removes_record() {
        let svc = service();
        let created = svc.create(jack()).await.unwrap();
        let snapshot = svc.delete(created.id).await.unwrap();
        assert_eq!(snapshot, created);
        let err = svc.find_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
    }
}
