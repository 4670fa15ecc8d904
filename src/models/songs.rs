use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[sea_orm(string_value = "easy")]
    Easy,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "hard")]
    Hard,
}

/// SeaORM entity for the `songs` table (the band's library).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub artist: String,
    pub key: Option<String>,
    pub tempo: Option<String>,
    pub difficulty: Difficulty,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub play_count: i32,
    pub last_played_at: Option<DateTimeUtc>,
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
pub struct CreateSong {
    pub title: String,
    pub artist: String,
    pub key: Option<String>,
    pub tempo: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub notes: Option<String>,
    pub tags: Option<String>,
}

/// Request body for `PATCH /api/songs/{id}`. Absent fields stay as they are;
/// an empty optional text field clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub notes: Option<String>,
    pub tags: Option<String>,
}
