use std::sync::Arc;

use tracing::info;

use crate::domain::{Event, User};
use crate::errors::ServiceError;
use crate::store::{EventStore, UserStore};

/// Manages the user-event membership edge set. A (user, event) pair is either
/// absent or a member; add and remove are the only transitions and both are
/// idempotent.
///
/// Two concurrent writes against the same event's membership set race
/// (last-write-wins on the persisted edge set); this layer accepts that.
#[derive(Clone)]
pub struct ParticipationService {
    events: Arc<dyn EventStore>,
    users: Arc<dyn UserStore>,
}

impl ParticipationService {
    pub fn new(events: Arc<dyn EventStore>, users: Arc<dyn UserStore>) -> Self {
        Self { events, users }
    }

    /// Unknown user ids simply yield an empty list; no existence check here.
    pub async fn find_events_for_user(&self, user_id: i64) -> Result<Vec<Event>, ServiceError> {
        self.events.find_by_participant(user_id).await
    }

    /// An event with an empty membership set is an error, not an empty list.
    /// Asymmetric with `find_events_for_user` on purpose.
    pub async fn find_users_for_event(&self, event_id: i64) -> Result<Vec<User>, ServiceError> {
        let event = self.events.get(event_id).await?.ok_or_else(|| {
            ServiceError::EventNotFound(format!(
                "There are not any events for provided id {event_id}"
            ))
        })?;
        if event.participants.is_empty() {
            return Err(ServiceError::UserNotFound(format!(
                "There are not any users for the event {event_id}"
            )));
        }
        Ok(event.participants)
    }

    pub async fn add_user_to_event(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Event, ServiceError> {
        let mut event = self.events.get(event_id).await?.ok_or_else(|| {
            ServiceError::EventNotFound(format!("Input event does not exist {event_id}"))
        })?;
        let user = self.users.get(user_id).await?.ok_or_else(|| {
            ServiceError::UserNotFound(format!("Input user does not exist {user_id}"))
        })?;
        if event.add_participant(user) {
            info!(event_id, user_id, "added user to event");
        }
        self.events
            .set_participants(event.id, &event.participant_ids())
            .await?;
        Ok(event)
    }

    pub async fn remove_user_from_event(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Event, ServiceError> {
        let mut event = self.events.get(event_id).await?.ok_or_else(|| {
            ServiceError::EventNotFound(format!("Input event does not exist {event_id}"))
        })?;
        self.users.get(user_id).await?.ok_or_else(|| {
            ServiceError::UserNotFound(format!("Input user does not exist {user_id}"))
        })?;
        if event.remove_participant(user_id) {
            info!(event_id, user_id, "removed user from event");
        }
        self.events
            .set_participants(event.id, &event.participant_ids())
            .await?;
        Ok(event)
    }
}
