//! Service layer for the event backend: domain records, the per-entity store
//! contracts, and the five services enforcing existence and referential
//! integrity across users, events, organizers, comments and participation.
//!
//! Each service call is one bounded sequence of store reads followed by at
//! most one store write; there are no cross-service transactions. Concurrent
//! membership writes against the same event are last-write-wins, which is an
//! accepted limitation of this layer.

pub mod comment_service;
pub mod domain;
pub mod errors;
pub mod event_service;
pub mod organizer_service;
pub mod participation_service;
pub mod store;
pub mod user_service;

pub use comment_service::CommentService;
pub use errors::ServiceError;
pub use event_service::EventService;
pub use organizer_service::OrganizerService;
pub use participation_service::ParticipationService;
pub use user_service::UserService;
