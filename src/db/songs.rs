use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::models::songs::{self, CreateSong, Difficulty};

/// Insert a new song into the library.
pub async fn insert_song<C: ConnectionTrait>(
    db: &C,
    input: CreateSong,
) -> Result<songs::Model, DbErr> {
    let new_song = songs::ActiveModel {
        id: NotSet,
        title: Set(input.title),
        artist: Set(input.artist),
        key: Set(input.key),
        tempo: Set(input.tempo),
        difficulty: Set(input.difficulty.unwrap_or(Difficulty::Medium)),
        notes: Set(input.notes),
        tags: Set(input.tags),
        play_count: Set(0),
        last_played_at: Set(None),
        created_at: Set(chrono::Utc::now()),
    };

    new_song.insert(db).await
}

/// Fetch the whole library ordered by artist, then title.
pub async fn get_all_songs<C: ConnectionTrait>(db: &C) -> Result<Vec<songs::Model>, DbErr> {
    songs::Entity::find()
        .order_by_asc(songs::Column::Artist)
        .order_by_asc(songs::Column::Title)
        .all(db)
        .await
}

/// Fetch a single song by ID.
pub async fn get_song_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<songs::Model>, DbErr> {
    songs::Entity::find_by_id(id).one(db).await
}

/// Count one more performance of a song. The increment happens in SQL so
/// concurrent completions in different events do not lose updates.
pub async fn record_play<C: ConnectionTrait>(
    db: &C,
    id: i32,
    played_at: chrono::DateTime<chrono::Utc>,
) -> Result<u64, DbErr> {
    let result = songs::Entity::update_many()
        .col_expr(songs::Column::PlayCount, Expr::cust("play_count + 1"))
        .col_expr(songs::Column::LastPlayedAt, Expr::value(played_at))
        .filter(songs::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Persist changes to an already-loaded song.
pub async fn save_song<C: ConnectionTrait>(
    db: &C,
    active: songs::ActiveModel,
) -> Result<songs::Model, DbErr> {
    active.update(db).await
}

/// Delete a song by ID. Fails with a foreign key violation while any signup
/// references it.
pub async fn delete_song<C: ConnectionTrait>(db: &C, id: i32) -> Result<DeleteResult, DbErr> {
    songs::Entity::delete_by_id(id).exec(db).await
}
