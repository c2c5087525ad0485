//! Domain records handled by the services. Identifiers are store-assigned;
//! drafts carry everything a create/update supplies except the id.
//!
//! Back-references are deliberately one-directional: an event embeds its
//! organizer and participants, but users and comments point back by id only,
//! so there are no reference cycles to maintain.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Accepted on input, never serialized outward.
    pub password: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub password: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organizer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganizer {
    pub name: String,
    pub email: String,
}

/// Organizer reference embedded in an event draft. `Some(id)` merges onto the
/// existing organizer row and repoints the event; `None` creates a fresh
/// organizer alongside the event (the cascaded one-to-one save).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerDraft {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub address: String,
    pub organizer: Organizer,
    /// Membership set; kept sorted by user id and duplicate-free.
    pub participants: Vec<User>,
}

impl Event {
    /// Set insert: adding an already-present member is a no-op.
    /// Returns whether the membership actually changed.
    pub fn add_participant(&mut self, user: User) -> bool {
        if self.participants.iter().any(|u| u.id == user.id) {
            return false;
        }
        self.participants.push(user);
        self.participants.sort_by_key(|u| u.id);
        true
    }

    /// Set removal: removing an absent member is a no-op.
    pub fn remove_participant(&mut self, user_id: i64) -> bool {
        let before = self.participants.len();
        self.participants.retain(|u| u.id != user_id);
        self.participants.len() != before
    }

    pub fn participant_ids(&self) -> Vec<i64> {
        self.participants.iter().map(|u| u.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: NaiveDate,
    pub address: String,
    pub organizer: OrganizerDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub contents: String,
    /// Endpoint references; accepted on input, never serialized outward.
    pub user_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub contents: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User {
            id,
            password: "pw".into(),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
        }
    }

    fn event() -> Event {
        Event {
            id: 1,
            name: "Party".into(),
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            address: "Wroclaw".into(),
            organizer: Organizer { id: 1, name: "org".into(), email: "org@example.com".into() },
            participants: Vec::new(),
        }
    }

    #[test]
    fn add_participant_is_idempotent() {
        let mut e = event();
        assert!(e.add_participant(user(3)));
        assert!(e.add_participant(user(2)));
        assert!(!e.add_participant(user(3)));
        assert_eq!(e.participant_ids(), vec![2, 3]);
    }

    #[test]
    fn remove_absent_participant_is_noop() {
        let mut e = event();
        e.add_participant(user(2));
        assert!(!e.remove_participant(9));
        assert!(e.remove_participant(2));
        assert!(e.participants.is_empty());
    }
}
