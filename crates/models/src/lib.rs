//! Row-level entities for the event service, one module per table, plus the
//! database connection helpers. Query logic lives in the `service` crate.
pub mod comment;
pub mod db;
pub mod event;
pub mod organizer;
pub mod participation;
pub mod user;

#[cfg(test)]
mod tests {
    use sea_orm::Related;

    // Both sides of every relation must resolve to a RelationDef.
    #[test]
    fn relations_link_both_directions() {
        let _ = <crate::comment::Entity as Related<crate::user::Entity>>::to();
        let _ = <crate::comment::Entity as Related<crate::event::Entity>>::to();
        let _ = <crate::participation::Entity as Related<crate::event::Entity>>::to();
        let _ = <crate::participation::Entity as Related<crate::user::Entity>>::to();
        let _ = <crate::event::Entity as Related<crate::organizer::Entity>>::to();
        let _ = <crate::organizer::Entity as Related<crate::event::Entity>>::to();
        let _ = <crate::user::Entity as Related<crate::comment::Entity>>::to();
    }
}
