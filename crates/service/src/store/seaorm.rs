//! SeaORM-backed store implementation over Postgres.
//!
//! Reads hydrate events from three tables (event, organizer, participation).
//! Writes are single-statement per record; replacing an event's membership
//! set is a delete-then-insert without a wrapping transaction, so two
//! concurrent membership writes on the same event are last-write-wins.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::domain::{
    Comment, Event, EventDraft, NewComment, NewOrganizer, NewUser, Organizer, OrganizerDraft, User,
};
use crate::errors::ServiceError;
use crate::store::{CommentStore, EventStore, OrganizerStore, UserStore};

pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn user_from_row(row: models::user::Model) -> User {
    User {
        id: row.id,
        password: row.password,
        username: row.username,
        email: row.email,
    }
}

fn organizer_from_row(row: models::organizer::Model) -> Organizer {
    Organizer {
        id: row.id,
        name: row.name,
        email: row.email,
    }
}

fn comment_from_row(row: models::comment::Model) -> Comment {
    Comment {
        id: row.id,
        contents: row.contents,
        user_id: row.user_id,
        event_id: row.event_id,
    }
}

impl SeaOrmStore {
    async fn hydrate(&self, row: models::event::Model) -> Result<Event, ServiceError> {
        let organizer = models::organizer::Entity::find_by_id(row.organizer_id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?
            .ok_or_else(|| {
                ServiceError::Db(format!(
                    "event {} references missing organizer {}",
                    row.id, row.organizer_id
                ))
            })?;

        let member_ids: Vec<i64> = models::participation::Entity::find()
            .filter(models::participation::Column::EventId.eq(row.id))
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?
            .into_iter()
            .map(|edge| edge.user_id)
            .collect();

        let participants = if member_ids.is_empty() {
            Vec::new()
        } else {
            models::user::Entity::find()
                .filter(models::user::Column::Id.is_in(member_ids))
                .order_by_asc(models::user::Column::Id)
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?
                .into_iter()
                .map(user_from_row)
                .collect()
        };

        Ok(Event {
            id: row.id,
            name: row.name,
            date: row.date,
            address: row.address,
            organizer: organizer_from_row(organizer),
            participants,
        })
    }

    async fn hydrate_all(
        &self,
        rows: Vec<models::event::Model>,
    ) -> Result<Vec<Event>, ServiceError> {
        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(self.hydrate(row).await?);
        }
        Ok(events)
    }

    /// Organizer cascade shared by event insert/update: merge onto the
    /// existing row when the draft carries an id, insert a fresh row
    /// otherwise. Returns the organizer id the event row should point at.
    async fn cascade_organizer(&self, draft: OrganizerDraft) -> Result<i64, ServiceError> {
        match draft.id {
            Some(oid) => {
                let row = models::organizer::ActiveModel {
                    id: Set(oid),
                    name: Set(draft.name),
                    email: Set(draft.email),
                };
                row.update(&self.db).await.map_err(ServiceError::db)?;
                Ok(oid)
            }
            None => {
                let row = models::organizer::ActiveModel {
                    id: NotSet,
                    name: Set(draft.name),
                    email: Set(draft.email),
                };
                let stored = row.insert(&self.db).await.map_err(ServiceError::db)?;
                Ok(stored.id)
            }
        }
    }
}

#[async_trait]
impl UserStore for SeaOrmStore {
    async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let rows = models::user::Entity::find()
            .order_by_asc(models::user::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(user_from_row).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let row = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(row.map(user_from_row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<User>, ServiceError> {
        let rows = models::user::Entity::find()
            .filter(models::user::Column::Username.eq(username))
            .order_by_asc(models::user::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(user_from_row).collect())
    }

    async fn insert(&self, new: NewUser) -> Result<User, ServiceError> {
        let row = models::user::ActiveModel {
            id: NotSet,
            password: Set(new.password),
            username: Set(new.username),
            email: Set(new.email),
        };
        let stored = row.insert(&self.db).await.map_err(ServiceError::db)?;
        Ok(user_from_row(stored))
    }

    async fn save(&self, user: &User) -> Result<User, ServiceError> {
        let row = models::user::ActiveModel {
            id: Set(user.id),
            password: Set(user.password.clone()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
        };
        let stored = row.update(&self.db).await.map_err(ServiceError::db)?;
        Ok(user_from_row(stored))
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        models::user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(())
    }
}

#[async_trait]
impl OrganizerStore for SeaOrmStore {
    async fn list(&self) -> Result<Vec<Organizer>, ServiceError> {
        let rows = models::organizer::Entity::find()
            .order_by_asc(models::organizer::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(organizer_from_row).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Organizer>, ServiceError> {
        let row = models::organizer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(row.map(organizer_from_row))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Organizer>, ServiceError> {
        let rows = models::organizer::Entity::find()
            .filter(models::organizer::Column::Name.eq(name))
            .order_by_asc(models::organizer::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(organizer_from_row).collect())
    }

    async fn insert(&self, new: NewOrganizer) -> Result<Organizer, ServiceError> {
        let row = models::organizer::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            email: Set(new.email),
        };
        let stored = row.insert(&self.db).await.map_err(ServiceError::db)?;
        Ok(organizer_from_row(stored))
    }

    async fn save(&self, organizer: &Organizer) -> Result<Organizer, ServiceError> {
        let row = models::organizer::ActiveModel {
            id: Set(organizer.id),
            name: Set(organizer.name.clone()),
            email: Set(organizer.email.clone()),
        };
        let stored = row.update(&self.db).await.map_err(ServiceError::db)?;
        Ok(organizer_from_row(stored))
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        models::organizer::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for SeaOrmStore {
    async fn list(&self) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn get(&self, id: i64) -> Result<Option<Event>, ServiceError> {
        let row = models::event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(models::event::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn find_by_address(&self, address: &str) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(models::event::Column::Address)))
                    .eq(address.to_lowercase()),
            )
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .filter(models::event::Column::Date.eq(date))
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn find_by_date_range(
        &self,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .filter(models::event::Column::Date.between(since, until))
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn find_by_name_address_date(
        &self,
        name: &str,
        address: &str,
        date: NaiveDate,
    ) -> Result<Vec<Event>, ServiceError> {
        let rows = models::event::Entity::find()
            .filter(models::event::Column::Name.eq(name))
            .filter(models::event::Column::Address.eq(address))
            .filter(models::event::Column::Date.eq(date))
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Option<Event>, ServiceError> {
        let row = models::event::Entity::find()
            .filter(models::event::Column::OrganizerId.eq(organizer_id))
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Event>, ServiceError> {
        let event_ids: Vec<i64> = models::participation::Entity::find()
            .filter(models::participation::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?
            .into_iter()
            .map(|edge| edge.event_id)
            .collect();
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = models::event::Entity::find()
            .filter(models::event::Column::Id.is_in(event_ids))
            .order_by_asc(models::event::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.hydrate_all(rows).await
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, ServiceError> {
        let organizer_id = self.cascade_organizer(draft.organizer).await?;
        let row = models::event::ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            date: Set(draft.date),
            address: Set(draft.address),
            organizer_id: Set(organizer_id),
        };
        let stored = row.insert(&self.db).await.map_err(ServiceError::db)?;
        self.hydrate(stored).await
    }

    async fn update(&self, id: i64, draft: EventDraft) -> Result<Event, ServiceError> {
        let organizer_id = self.cascade_organizer(draft.organizer).await?;
        let row = models::event::ActiveModel {
            id: Set(id),
            name: Set(draft.name),
            date: Set(draft.date),
            address: Set(draft.address),
            organizer_id: Set(organizer_id),
        };
        let stored = row.update(&self.db).await.map_err(ServiceError::db)?;
        self.hydrate(stored).await
    }

    async fn set_participants(&self, event_id: i64, user_ids: &[i64]) -> Result<(), ServiceError> {
        models::participation::Entity::delete_many()
            .filter(models::participation::Column::EventId.eq(event_id))
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        if user_ids.is_empty() {
            return Ok(());
        }
        let edges = user_ids.iter().map(|uid| models::participation::ActiveModel {
            event_id: Set(event_id),
            user_id: Set(*uid),
        });
        models::participation::Entity::insert_many(edges)
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let row = models::event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        // Participation edges go with the event via the FK cascade.
        models::event::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        // The organizer row is owned one-to-one by its event and goes with it.
        if let Some(row) = row {
            models::organizer::Entity::delete_by_id(row.organizer_id)
                .exec(&self.db)
                .await
                .map_err(ServiceError::db)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for SeaOrmStore {
    async fn get(&self, id: i64) -> Result<Option<Comment>, ServiceError> {
        let row = models::comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(row.map(comment_from_row))
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Comment>, ServiceError> {
        let rows = models::comment::Entity::find()
            .filter(models::comment::Column::EventId.eq(event_id))
            .order_by_asc(models::comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(comment_from_row).collect())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Comment>, ServiceError> {
        let rows = models::comment::Entity::find()
            .filter(models::comment::Column::UserId.eq(user_id))
            .order_by_asc(models::comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(comment_from_row).collect())
    }

    async fn find_by_event_and_user(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Vec<Comment>, ServiceError> {
        let rows = models::comment::Entity::find()
            .filter(models::comment::Column::EventId.eq(event_id))
            .filter(models::comment::Column::UserId.eq(user_id))
            .order_by_asc(models::comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(comment_from_row).collect())
    }

    async fn insert(
        &self,
        new: NewComment,
        user_id: i64,
        event_id: i64,
    ) -> Result<Comment, ServiceError> {
        let row = models::comment::ActiveModel {
            id: NotSet,
            contents: Set(new.contents),
            user_id: Set(user_id),
            event_id: Set(event_id),
        };
        let stored = row.insert(&self.db).await.map_err(ServiceError::db)?;
        Ok(comment_from_row(stored))
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        models::comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganizerDraft;
    use migration::MigratorTrait;

    // Smoke test against a real Postgres; skipped unless DATABASE_URL is set.
    #[tokio::test]
    async fn seaorm_store_round_trip() -> anyhow::Result<()> {
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL missing; skip seaorm store test");
            return Ok(());
        }
        let db = match models::db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {e}");
                return Ok(());
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {e}");
            return Ok(());
        }
        let store = SeaOrmStore::new(db);

        let user = UserStore::insert(
            &store,
            NewUser {
                password: "secret".into(),
                username: "smoke_user".into(),
                email: "smoke@example.com".into(),
            },
        )
        .await?;
        let event = EventStore::insert(
            &store,
            EventDraft {
                name: "Smoke".into(),
                date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                address: "Wroclaw".into(),
                organizer: OrganizerDraft {
                    id: None,
                    name: "smoke org".into(),
                    email: "org@example.com".into(),
                },
            },
        )
        .await?;

        store.set_participants(event.id, &[user.id]).await?;
        let got = EventStore::get(&store, event.id).await?.expect("event exists");
        assert_eq!(got.participant_ids(), vec![user.id]);

        // Cleanup; edges and the owned organizer row go with the event.
        EventStore::delete(&store, event.id).await?;
        UserStore::delete(&store, user.id).await?;
        assert!(OrganizerStore::get(&store, event.organizer.id).await?.is_none());
        Ok(())
    }
}
