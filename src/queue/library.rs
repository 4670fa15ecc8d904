//! The band's song library, as far as the queue needs it.

use sea_orm::{DatabaseConnection, IntoActiveModel, Set, SqlErr};
use tracing::info;

use crate::db::songs as song_db;
use crate::error::{QueueError, QueueResult};
use crate::models::signups::normalize;
use crate::models::songs::{self, CreateSong, UpdateSong};

pub async fn create_song(db: &DatabaseConnection, input: CreateSong) -> QueueResult<songs::Model> {
    let title = normalize(Some(input.title))
        .ok_or_else(|| QueueError::Validation("Song title is required".to_string()))?;
    let artist = normalize(Some(input.artist))
        .ok_or_else(|| QueueError::Validation("Song artist is required".to_string()))?;

    let song = song_db::insert_song(
        db,
        CreateSong {
            title,
            artist,
            key: normalize(input.key),
            tempo: normalize(input.tempo),
            notes: normalize(input.notes),
            tags: normalize(input.tags),
            difficulty: input.difficulty,
        },
    )
    .await?;

    info!(song_id = song.id, "Song added to library");
    Ok(song)
}

pub async fn list_songs(db: &DatabaseConnection) -> QueueResult<Vec<songs::Model>> {
    Ok(song_db::get_all_songs(db).await?)
}

pub async fn get_song(db: &DatabaseConnection, song_id: i32) -> QueueResult<songs::Model> {
    song_db::get_song_by_id(db, song_id)
        .await?
        .ok_or(QueueError::not_found("Song", song_id))
}

pub async fn update_song(
    db: &DatabaseConnection,
    song_id: i32,
    patch: UpdateSong,
) -> QueueResult<songs::Model> {
    let mut active = get_song(db, song_id).await?.into_active_model();

    if let Some(title) = patch.title {
        let title = normalize(Some(title))
            .ok_or_else(|| QueueError::Validation("Song title cannot be empty".to_string()))?;
        active.title = Set(title);
    }
    if let Some(artist) = patch.artist {
        let artist = normalize(Some(artist))
            .ok_or_else(|| QueueError::Validation("Song artist cannot be empty".to_string()))?;
        active.artist = Set(artist);
    }
    if let Some(key) = patch.key {
        active.key = Set(normalize(Some(key)));
    }
    if let Some(tempo) = patch.tempo {
        active.tempo = Set(normalize(Some(tempo)));
    }
    if let Some(difficulty) = patch.difficulty {
        active.difficulty = Set(difficulty);
    }
    if let Some(notes) = patch.notes {
        active.notes = Set(normalize(Some(notes)));
    }
    if let Some(tags) = patch.tags {
        active.tags = Set(normalize(Some(tags)));
    }

    let updated = song_db::save_song(db, active).await?;

    info!(song_id, "Song updated");
    Ok(updated)
}

/// Remove a song nobody has signed up with. Songs referenced by any signup,
/// past or present, stay; the restricting foreign key enforces it.
pub async fn delete_song(db: &DatabaseConnection, song_id: i32) -> QueueResult<()> {
    let result = song_db::delete_song(db, song_id)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => QueueError::SongInUse(song_id),
            _ => QueueError::Db(e),
        })?;
    if result.rows_affected == 0 {
        return Err(QueueError::not_found("Song", song_id));
    }

    info!(song_id, "Song removed from library");
    Ok(())
}
