use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Signups {
    Table,
    EventId,
    DeviceId,
    Position,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Queue listings are always read in position order per event
        manager
            .create_index(
                Index::create()
                    .name("idx_signups_event_position")
                    .table(Signups::Table)
                    .col(Signups::EventId)
                    .col(Signups::Position)
                    .to_owned(),
            )
            .await?;

        // Active-signup lookups per device
        manager
            .create_index(
                Index::create()
                    .name("idx_signups_event_device_status")
                    .table(Signups::Table)
                    .col(Signups::EventId)
                    .col(Signups::DeviceId)
                    .col(Signups::Status)
                    .to_owned(),
            )
            .await?;

        // At most one on_deck and one performing signup per event.
        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_signups_event_on_deck \
             ON signups (event_id) WHERE status = 'on_deck'",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_signups_event_performing \
             ON signups (event_id) WHERE status = 'performing'",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_signups_event_performing").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uq_signups_event_on_deck").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_signups_event_device_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_signups_event_position").to_owned())
            .await?;

        Ok(())
    }
}
