use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Event: organizer FK and date lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_event_organizer")
                    .table(Event::Table)
                    .col(Event::OrganizerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_date")
                    .table(Event::Table)
                    .col(Event::Date)
                    .to_owned(),
            )
            .await?;

        // Comment: per-user and per-event scans
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_user")
                    .table(Comment::Table)
                    .col(Comment::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_event")
                    .table(Comment::Table)
                    .col(Comment::EventId)
                    .to_owned(),
            )
            .await?;

        // Participation: inverse direction (events for a user)
        manager
            .create_index(
                Index::create()
                    .name("idx_participation_user")
                    .table(Participation::Table)
                    .col(Participation::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_event_organizer").table(Event::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_event_date").table(Event::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comment_user").table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comment_event").table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_participation_user")
                    .table(Participation::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    OrganizerId,
    Date,
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    UserId,
    EventId,
}

#[derive(DeriveIden)]
enum Participation {
    Table,
    UserId,
}
