use std::sync::Arc;

use tracing::info;

use crate::domain::{NewOrganizer, Organizer};
use crate::errors::ServiceError;
use crate::store::OrganizerStore;

/// CRUD plus name lookup over organizer records. An organizer may exist
/// without an event; the event side owns the reference.
#[derive(Clone)]
pub struct OrganizerService {
    store: Arc<dyn OrganizerStore>,
}

impl OrganizerService {
    pub fn new(store: Arc<dyn OrganizerStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Organizer>, ServiceError> {
        self.store.list().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Organizer, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::OrganizerNotFound(format!("Organizer not found {id}")))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Organizer>, ServiceError> {
        let organizers = self.store.find_by_name(name).await?;
        if organizers.is_empty() {
            return Err(ServiceError::OrganizerNotFound(format!(
                "Organizer not found {name}"
            )));
        }
        Ok(organizers)
    }

    pub async fn create(&self, new: NewOrganizer) -> Result<Organizer, ServiceError> {
        let organizer = self.store.insert(new).await?;
        info!(organizer_id = organizer.id, "created organizer");
        Ok(organizer)
    }

    /// Copies name and email onto the stored record.
    pub async fn update(&self, changes: NewOrganizer, id: i64) -> Result<Organizer, ServiceError> {
        let mut organizer = self.find_by_id(id).await?;
        organizer.name = changes.name;
        organizer.email = changes.email;
        self.store.save(&organizer).await
    }

    /// Returns the pre-deletion snapshot.
    pub async fn delete(&self, id: i64) -> Result<Organizer, ServiceError> {
        let organizer = self.find_by_id(id).await?;
        self.store.delete(id).await?;
        info!(organizer_id = id, "deleted organizer");
        Ok(organizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> OrganizerService {
        OrganizerService::new(Arc::new(MemoryStore::new()))
    }

    fn acme() -> NewOrganizer {
        NewOrganizer {
            name: "acme".into(),
            email: "acme@example.com".into(),
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let svc = service();
        let created = svc.create(acme()).await.unwrap();
        assert_eq!(svc.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn find_by_name_fails_on_empty_match() {
        let svc = service();
        svc.create(acme()).await.unwrap();
        assert_eq!(svc.find_by_name("acme").await.unwrap().len(), 1);
        let err = svc.find_by_name("globex").await.unwrap_err();
        assert!(matches!(err, ServiceError::OrganizerNotFound(_)));
    }

    #[tokio::test]
    async fn update_copies_name_and_email() {
        let svc = service();
        let created = svc.create(acme()).await.unwrap();
        let updated = svc
            .update(
                NewOrganizer { name: "globex".into(), email: "globex@example.com".into() },
                created.id,
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "globex");
    }

    #[tokio::test]
    async fn delete_returns_snapshot_then_not_found() {
        let svc = service();
        let created = svc.create(acme()).await.unwrap();
        let snapshot = svc.delete(created.id).await.unwrap();
        assert_eq!(snapshot, created);
        assert!(matches!(
            svc.find_by_id(created.id).await.unwrap_err(),
            ServiceError::OrganizerNotFound(_)
        ));
        assert!(matches!(
            svc.delete(created.id).await.unwrap_err(),
            ServiceError::OrganizerNotFound(_)
        ));
    }
}
