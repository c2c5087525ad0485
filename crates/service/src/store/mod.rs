//! Store contracts: per-entity persistence with id-keyed access and the
//! predicate scans the services rely on. Backends provide atomic per-record
//! get/put; nothing here spans more than one entity except the event
//! cascades (organizer merge and participation edge replacement).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Comment, Event, EventDraft, NewComment, NewOrganizer, NewUser, Organizer, User,
};
use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Vec<User>, ServiceError>;
    async fn insert(&self, new: NewUser) -> Result<User, ServiceError>;
    /// Full-row replace of an existing record.
    async fn save(&self, user: &User) -> Result<User, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait OrganizerStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Organizer>, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<Organizer>, ServiceError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Organizer>, ServiceError>;
    async fn insert(&self, new: NewOrganizer) -> Result<Organizer, ServiceError>;
    async fn save(&self, organizer: &Organizer) -> Result<Organizer, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Event>, ServiceError>;
    /// Hydrated read: organizer and participants included.
    async fn get(&self, id: i64) -> Result<Option<Event>, ServiceError>;
    /// Case-insensitive name match.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>, ServiceError>;
    /// Case-insensitive address match.
    async fn find_by_address(&self, address: &str) -> Result<Vec<Event>, ServiceError>;
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, ServiceError>;
    /// Inclusive range scan.
    async fn find_by_date_range(
        &self,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError>;
    /// Exact composite match.
    async fn find_by_name_address_date(
        &self,
        name: &str,
        address: &str,
        date: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError>;
    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Option<Event>, ServiceError>;
    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Event>, ServiceError>;
    /// Cascades the embedded organizer draft (merge or create).
    async fn insert(&self, draft: EventDraft) -> Result<Event, ServiceError>;
    /// Replaces name/date/address/organizer of an existing event. The
    /// membership set and comments are untouched.
    async fn update(&self, id: i64, draft: EventDraft) -> Result<Event, ServiceError>;
    /// Replaces the membership edge set of an event.
    async fn set_participants(&self, event_id: i64, user_ids: &[i64]) -> Result<(), ServiceError>;
    /// Removes the event, its participation edges, and the owned organizer
    /// row. Users and comments are untouched.
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Comment>, ServiceError>;
    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Comment>, ServiceError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Comment>, ServiceError>;
    async fn find_by_event_and_user(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Vec<Comment>, ServiceError>;
    async fn insert(
        &self,
        new: NewComment,
        user_id: i64,
        event_id: i64,
    ) -> Result<Comment, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}
