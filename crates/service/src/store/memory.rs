//! In-memory store backend. Used by unit tests and the boundary test server;
//! mirrors the relational layout (rows plus an edge set) rather than holding
//! object graphs, so it exercises the same hydration paths as the SQL backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Comment, Event, EventDraft, NewComment, NewOrganizer, NewUser, Organizer, User,
};
use crate::errors::ServiceError;
use crate::store::{CommentStore, EventStore, OrganizerStore, UserStore};

#[derive(Debug, Clone, PartialEq, Eq)]
struct EventRow {
    id: i64,
    name: String,
    date: NaiveDate,
    address: String,
    organizer_id: i64,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    organizers: BTreeMap<i64, Organizer>,
    events: BTreeMap<i64, EventRow>,
    comments: BTreeMap<i64, Comment>,
    /// event id -> member user ids
    edges: BTreeMap<i64, BTreeSet<i64>>,
    next_user_id: i64,
    next_organizer_id: i64,
    next_event_id: i64,
    next_comment_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn hydrate(inner: &Inner, row: &EventRow) -> Result<Event, ServiceError> {
    let organizer = inner
        .organizers
        .get(&row.organizer_id)
        .cloned()
        .ok_or_else(|| {
            ServiceError::Db(format!(
                "event {} references missing organizer {}",
                row.id, row.organizer_id
            ))
        })?;
    let participants = inner
        .edges
        .get(&row.id)
        .map(|ids| {
            ids.iter()
                .filter_map(|uid| inner.users.get(uid).cloned())
                .collect()
        })
        .unwrap_or_default();
    Ok(Event {
        id: row.id,
        name: row.name.clone(),
        date: row.date,
        address: row.address.clone(),
        organizer,
        participants,
    })
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<User>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .filter(|u| u.username == username)
            .cloned()
            .collect())
    }

    async fn insert(&self, new: NewUser) -> Result<User, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_user_id);
        let user = User {
            id,
            password: new.password,
            username: new.username,
            email: new.email,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(&user.id) {
            return Err(ServiceError::Db(format!("no user row {}", user.id)));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.comments.values().any(|c| c.user_id == id) {
            return Err(ServiceError::Db(format!(
                "user {id} is still referenced by comments"
            )));
        }
        inner.users.remove(&id);
        // Membership edges follow the user, as the FK cascade does.
        for members in inner.edges.values_mut() {
            members.remove(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizerStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Organizer>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.organizers.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Organizer>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.organizers.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Organizer>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .organizers
            .values()
            .filter(|o| o.name == name)
            .cloned()
            .collect())
    }

    async fn insert(&self, new: NewOrganizer) -> Result<Organizer, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_organizer_id);
        let organizer = Organizer {
            id,
            name: new.name,
            email: new.email,
        };
        inner.organizers.insert(id, organizer.clone());
        Ok(organizer)
    }

    async fn save(&self, organizer: &Organizer) -> Result<Organizer, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.organizers.contains_key(&organizer.id) {
            return Err(ServiceError::Db(format!("no organizer row {}", organizer.id)));
        }
        inner.organizers.insert(organizer.id, organizer.clone());
        Ok(organizer.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.events.values().any(|e| e.organizer_id == id) {
            return Err(ServiceError::Db(format!(
                "organizer {id} is still referenced by an event"
            )));
        }
        inner.organizers.remove(&id);
        Ok(())
    }
}

impl MemoryStore {
    /// Organizer cascade shared by event insert/update: merge onto an
    /// existing row when the draft carries an id, create otherwise.
    fn cascade_organizer(
        inner: &mut Inner,
        draft: crate::domain::OrganizerDraft,
    ) -> Result<i64, ServiceError> {
        match draft.id {
            Some(oid) => {
                let row = inner
                    .organizers
                    .get_mut(&oid)
                    .ok_or_else(|| ServiceError::Db(format!("no organizer row {oid}")))?;
                row.name = draft.name;
                row.email = draft.email;
                Ok(oid)
            }
            None => {
                let oid = next_id(&mut inner.next_organizer_id);
                inner.organizers.insert(
                    oid,
                    Organizer {
                        id: oid,
                        name: draft.name,
                        email: draft.email,
                    },
                );
                Ok(oid)
            }
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner.events.values().map(|row| hydrate(&inner, row)).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .get(&id)
            .map(|row| hydrate(&inner, row))
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>, ServiceError> {
        let needle = name.to_lowercase();
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| row.name.to_lowercase() == needle)
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn find_by_address(&self, address: &str) -> Result<Vec<Event>, ServiceError> {
        let needle = address.to_lowercase();
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| row.address.to_lowercase() == needle)
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| row.date == date)
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn find_by_date_range(
        &self,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| row.date >= since && row.date <= until)
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn find_by_name_address_date(
        &self,
        name: &str,
        address: &str,
        date: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| row.name == name && row.address == address && row.date == date)
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Option<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .find(|row| row.organizer_id == organizer_id)
            .map(|row| hydrate(&inner, row))
            .transpose()
    }

    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Event>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .values()
            .filter(|row| {
                inner
                    .edges
                    .get(&row.id)
                    .map(|m| m.contains(&user_id))
                    .unwrap_or(false)
            })
            .map(|row| hydrate(&inner, row))
            .collect()
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let organizer_id = Self::cascade_organizer(&mut inner, draft.organizer)?;
        let id = next_id(&mut inner.next_event_id);
        let row = EventRow {
            id,
            name: draft.name,
            date: draft.date,
            address: draft.address,
            organizer_id,
        };
        inner.events.insert(id, row.clone());
        hydrate(&inner, &row)
    }

    async fn update(&self, id: i64, draft: EventDraft) -> Result<Event, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.events.contains_key(&id) {
            return Err(ServiceError::Db(format!("no event row {id}")));
        }
        let organizer_id = Self::cascade_organizer(&mut inner, draft.organizer)?;
        let row = inner.events.get_mut(&id).expect("checked above");
        row.name = draft.name;
        row.date = draft.date;
        row.address = draft.address;
        row.organizer_id = organizer_id;
        let row = row.clone();
        hydrate(&inner, &row)
    }

    async fn set_participants(&self, event_id: i64, user_ids: &[i64]) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.events.contains_key(&event_id) {
            return Err(ServiceError::Db(format!("no event row {event_id}")));
        }
        inner.edges.insert(event_id, user_ids.iter().copied().collect());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.comments.values().any(|c| c.event_id == id) {
            return Err(ServiceError::Db(format!(
                "event {id} is still referenced by comments"
            )));
        }
        let removed = inner.events.remove(&id);
        inner.edges.remove(&id);
        // The organizer row is owned one-to-one by its event and goes with it.
        if let Some(row) = removed {
            if inner
                .events
                .values()
                .any(|e| e.organizer_id == row.organizer_id)
            {
                return Err(ServiceError::Db(format!(
                    "organizer {} is still referenced by an event",
                    row.organizer_id
                )));
            }
            inner.organizers.remove(&row.organizer_id);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Comment>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.comments.get(&id).cloned())
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Comment>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .values()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Comment>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_event_and_user(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Vec<Comment>, ServiceError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .values()
            .filter(|c| c.event_id == event_id && c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        new: NewComment,
        user_id: i64,
        event_id: i64,
    ) -> Result<Comment, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_comment_id);
        let comment = Comment {
            id,
            contents: new.contents,
            user_id,
            event_id,
        };
        inner.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.comments.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganizerDraft;

    fn draft(name: &str) -> EventDraft {
        EventDraft {
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            address: "Wroclaw".into(),
            organizer: OrganizerDraft {
                id: None,
                name: "org".into(),
                email: "org@example.com".into(),
            },
        }
    }

    #[tokio::test]
    async fn event_insert_cascades_new_organizer() {
        let store = MemoryStore::new();
        let event = EventStore::insert(&store, draft("Party")).await.unwrap();
        assert_eq!(event.id, 1);
        assert!(event.organizer.id > 0);
        let orgs = OrganizerStore::list(&store).await.unwrap();
        assert_eq!(orgs.len(), 1);
    }

    #[tokio::test]
    async fn event_update_merges_existing_organizer() {
        let store = MemoryStore::new();
        let event = EventStore::insert(&store, draft("Party")).await.unwrap();
        let mut d = draft("Renamed");
        d.organizer = OrganizerDraft {
            id: Some(event.organizer.id),
            name: "renamed org".into(),
            email: "org@example.com".into(),
        };
        let updated = EventStore::update(&store, event.id, d).await.unwrap();
        assert_eq!(updated.organizer.id, event.organizer.id);
        assert_eq!(updated.organizer.name, "renamed org");
        // Still a single organizer row.
        assert_eq!(OrganizerStore::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn event_delete_takes_the_owned_organizer_row() {
        let store = MemoryStore::new();
        let event = EventStore::insert(&store, draft("Party")).await.unwrap();
        assert_eq!(OrganizerStore::list(&store).await.unwrap().len(), 1);
        EventStore::delete(&store, event.id).await.unwrap();
        assert!(OrganizerStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_participants_replaces_edge_set() {
        let store = MemoryStore::new();
        let event = EventStore::insert(&store, draft("Party")).await.unwrap();
        let u = UserStore::insert(
            &store,
            NewUser {
                password: "pw".into(),
                username: "jack".into(),
                email: "jack@example.com".into(),
            },
        )
        .await
        .unwrap();
        store.set_participants(event.id, &[u.id]).await.unwrap();
        let got = EventStore::get(&store, event.id).await.unwrap().unwrap();
        assert_eq!(got.participant_ids(), vec![u.id]);
        store.set_participants(event.id, &[]).await.unwrap();
        let got = EventStore::get(&store, event.id).await.unwrap().unwrap();
        assert!(got.participants.is_empty());
    }
}
