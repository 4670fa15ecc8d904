use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `signups` table and its columns.
#[derive(DeriveIden)]
enum Signups {
    Table,
    Id,
    EventId,
    DeviceId,
    PerformerName,
    Type,
    SongId,
    RequestText,
    RequestStatus,
    DeclineReason,
    Position,
    Status,
    Notes,
    HostNotes,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Songs {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Signups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Signups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Signups::EventId).integer().not_null())
                    .col(ColumnDef::new(Signups::DeviceId).string().not_null())
                    .col(ColumnDef::new(Signups::PerformerName).string().not_null())
                    .col(ColumnDef::new(Signups::Type).string().not_null())
                    .col(ColumnDef::new(Signups::SongId).integer().null())
                    .col(ColumnDef::new(Signups::RequestText).text().null())
                    .col(ColumnDef::new(Signups::RequestStatus).string().null())
                    .col(ColumnDef::new(Signups::DeclineReason).text().null())
                    .col(ColumnDef::new(Signups::Position).integer().not_null())
                    .col(
                        ColumnDef::new(Signups::Status)
                            .string()
                            .not_null()
                            .default("waiting"),
                    )
                    .col(ColumnDef::new(Signups::Notes).text().null())
                    .col(ColumnDef::new(Signups::HostNotes).text().null())
                    .col(
                        ColumnDef::new(Signups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Signups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_signups_event_id")
                            .from(Signups::Table, Signups::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // A referenced song must be released before it can be deleted.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_signups_song_id")
                            .from(Signups::Table, Signups::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Signups::Table).to_owned())
            .await
    }
}
