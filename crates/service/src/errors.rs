use thiserror::Error;

/// One kind per missing-entity class. All of them are terminal for the
/// request; the boundary collapses every `*NotFound` kind into a single 404.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("event not found: {0}")]
    EventNotFound(String),
    #[error("organizer not found: {0}")]
    OrganizerNotFound(String),
    #[error("comment not found: {0}")]
    CommentNotFound(String),
    #[error("participation not found: {0}")]
    ParticipationNotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ServiceError::Db(_))
    }

    pub fn db(e: impl std::fmt::Display) -> Self {
        Self::Db(e.to_string())
    }
}
