use std::sync::Arc;

use service::store::{CommentStore, EventStore, OrganizerStore, UserStore};
use service::{
    CommentService, EventService, OrganizerService, ParticipationService, UserService,
};

/// Shared handler state: one service per aggregate, all of them cheap to
/// clone.
#[derive(Clone)]
pub struct ServerState {
    pub users: UserService,
    pub organizers: OrganizerService,
    pub events: EventService,
    pub comments: CommentService,
    pub participation: ParticipationService,
}

impl ServerState {
    /// Wires every service against a single backing store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserStore + OrganizerStore + EventStore + CommentStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let organizers: Arc<dyn OrganizerStore> = store.clone();
        let events: Arc<dyn EventStore> = store.clone();
        let comments: Arc<dyn CommentStore> = store;
        Self {
            users: UserService::new(users.clone()),
            organizers: OrganizerService::new(organizers),
            events: EventService::new(events.clone()),
            comments: CommentService::new(comments, users.clone(), events.clone()),
            participation: ParticipationService::new(events, users),
        }
    }
}
