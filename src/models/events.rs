use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event lifecycle stored as a lowercase string in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl EventStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Draft events can open or be abandoned; active events can only close.
    /// Closed is terminal.
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Active) | (Self::Draft, Self::Closed) | (Self::Active, Self::Closed)
        )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SeaORM entity for the `events` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date: chrono::NaiveDate,
    pub venue: Option<String>,
    #[sea_orm(unique)]
    pub code: String,
    pub status: EventStatus,
    pub allow_multiple_signups: bool,
    /// Highest position ever handed out in this event's queue.
    pub last_position: i32,
    /// Bumped by every queue mutation so polling clients can detect change.
    pub queue_version: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::signups::Entity")]
    Signups,
}

impl Related<super::signups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Signups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub date: chrono::NaiveDate,
    pub venue: Option<String>,
    /// Join code; generated when omitted.
    pub code: Option<String>,
    pub allow_multiple_signups: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    pub venue: Option<String>,
    pub code: Option<String>,
    pub allow_multiple_signups: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventStatus {
    pub status: EventStatus,
}
