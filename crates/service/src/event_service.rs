use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Event, EventDraft};
use crate::errors::ServiceError;
use crate::store::EventStore;

/// CRUD and the event lookups. Single-field lookups treat an empty match set
/// as `EventNotFound`; the date-range scan does not — that asymmetry is part
/// of the contract.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Event>, ServiceError> {
        self.store.list().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Event, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::EventNotFound(format!("Event not found {id}")))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_by_name(name).await?;
        if events.is_empty() {
            return Err(ServiceError::EventNotFound(format!("Event not found {name}")));
        }
        Ok(events)
    }

    pub async fn find_by_address(&self, address: &str) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_by_address(address).await?;
        if events.is_empty() {
            return Err(ServiceError::EventNotFound(format!(
                "Event not found {address}"
            )));
        }
        Ok(events)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_by_date(date).await?;
        if events.is_empty() {
            return Err(ServiceError::EventNotFound(format!(
                "Event not found by given date {date}"
            )));
        }
        Ok(events)
    }

    /// Inclusive range scan; an empty result is a successful empty list.
    pub async fn find_by_date_range(
        &self,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        self.store.find_by_date_range(since, until).await
    }

    /// Absence is not an error here; the boundary decides what it means.
    pub async fn find_by_organizer_id(&self, organizer_id: i64) -> Result<Option<Event>, ServiceError> {
        self.store.find_by_organizer(organizer_id).await
    }

    pub async fn find_by_name_address_date(
        &self,
        name: &str,
        address: &str,
        date: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        let events = self
            .store
            .find_by_name_address_date(name, address, date)
            .await?;
        if events.is_empty() {
            return Err(ServiceError::EventNotFound("Event not found".to_string()));
        }
        Ok(events)
    }

    /// The embedded organizer reference is taken at face value and cascaded
    /// by the store; no existence check happens at this layer.
    pub async fn create(&self, draft: EventDraft) -> Result<Event, ServiceError> {
        let event = self.store.insert(draft).await?;
        info!(event_id = event.id, "created event");
        Ok(event)
    }

    /// Replaces name/address/date/organizer. The membership set and comments
    /// are untouched by update.
    pub async fn update(&self, draft: EventDraft, id: i64) -> Result<Event, ServiceError> {
        self.find_by_id(id).await?;
        self.store.update(id, draft).await
    }

    /// Returns the pre-deletion snapshot.
    pub async fn delete(&self, id: i64) -> Result<Event, ServiceError> {
        let event = self.find_by_id(id).await?;
        self.store.delete(id).await?;
        info!(event_id = id, "deleted event");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganizerDraft;
    use crate::store::memory::MemoryStore;

    fn service() -> EventService {
        EventService::new(Arc::new(MemoryStore::new()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn party(name: &str, on: NaiveDate, address: &str) -> EventDraft {
        EventDraft {
            name: name.into(),
            date: on,
            address: address.into(),
            organizer: OrganizerDraft {
                id: None,
                name: "acme".into(),
                email: "acme@example.com".into(),
            },
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_round_trips() {
        let svc = service();
        let created = svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        let found = svc.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.organizer.name, "acme");
        assert!(found.participants.is_empty());
    }

    #[tokio::test]
    async fn name_and_address_lookups_are_case_insensitive() {
        let svc = service();
        svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        assert_eq!(svc.find_by_name("pArTy").await.unwrap().len(), 1);
        assert_eq!(svc.find_by_address("wroclaw").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn single_field_lookups_fail_on_empty_match() {
        let svc = service();
        svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        assert!(matches!(
            svc.find_by_name("concert").await.unwrap_err(),
            ServiceError::EventNotFound(_)
        ));
        assert!(matches!(
            svc.find_by_address("London").await.unwrap_err(),
            ServiceError::EventNotFound(_)
        ));
        assert!(matches!(
            svc.find_by_date(date(2020, 5, 5)).await.unwrap_err(),
            ServiceError::EventNotFound(_)
        ));
        assert!(matches!(
            svc.find_by_name_address_date("Party", "London", date(2019, 1, 1))
                .await
                .unwrap_err(),
            ServiceError::EventNotFound(_)
        ));
    }

    #[tokio::test]
    async fn date_range_with_no_matches_is_an_empty_list() {
        let svc = service();
        svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        // Contrast with find_by_date, which fails on the same window.
        let hits = svc
            .find_by_date_range(date(2021, 1, 1), date(2021, 12, 31))
            .await
            .unwrap();
        assert!(hits.is_empty());
        let hits = svc
            .find_by_date_range(date(2019, 1, 1), date(2019, 1, 1))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn composite_lookup_matches_exactly() {
        let svc = service();
        svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        let hits = svc
            .find_by_name_address_date("Party", "Wroclaw", date(2019, 1, 1))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn find_by_organizer_id_returns_none_without_error() {
        let svc = service();
        let created = svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        let hit = svc.find_by_organizer_id(created.organizer.id).await.unwrap();
        assert_eq!(hit.unwrap().id, created.id);
        assert!(svc.find_by_organizer_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_fields_and_cascades_organizer() {
        let svc = service();
        let created = svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        let draft = EventDraft {
            name: "Gala".into(),
            date: date(2019, 2, 2),
            address: "London".into(),
            organizer: OrganizerDraft {
                id: Some(created.organizer.id),
                name: "acme events".into(),
                email: "acme@example.com".into(),
            },
        };
        let updated = svc.update(draft, created.id).await.unwrap();
        assert_eq!(updated.name, "Gala");
        assert_eq!(updated.address, "London");
        assert_eq!(updated.organizer.id, created.organizer.id);
        assert_eq!(updated.organizer.name, "acme events");
    }

    #[tokio::test]
    async fn update_on_unknown_id_fails_before_writing() {
        let svc = service();
        let err = svc
            .update(party("Party", date(2019, 1, 1), "Wroclaw"), 42)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EventNotFound(_)));
        assert!(svc.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_snapshot_then_not_found() {
        let svc = service();
        let created = svc.create(party("Party", date(2019, 1, 1), "Wroclaw")).await.unwrap();
        let snapshot = svc.delete(created.id).await.unwrap();
        assert_eq!(snapshot, created);
        assert!(matches!(
            svc.find_by_id(created.id).await.unwrap_err(),
            ServiceError::EventNotFound(_)
        ));
    }
}
