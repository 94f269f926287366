//! Playlist persistence
//!
//! Membership is a set: adding a song that is already present is a no-op.

use musicbox_common::db::{Playlist, Song};
use musicbox_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use super::songs::row_to_song;

fn row_to_playlist(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
    })
}

/// Save a new, empty playlist owned by `user_id`
pub async fn create_playlist<'e>(executor: impl SqliteExecutor<'e>, name: &str, user_id: i64) -> Result<Playlist> {
    let result = sqlx::query("INSERT INTO playlists (name, user_id) VALUES (?, ?)")
        .bind(name)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(Playlist {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        user_id,
    })
}

pub async fn find_playlist<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, user_id FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(row_to_playlist).transpose()
}

pub async fn list_playlists_by_user<'e>(executor: impl SqliteExecutor<'e>, user_id: i64) -> Result<Vec<Playlist>> {
    let rows = sqlx::query("SELECT id, name, user_id FROM playlists WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    rows.iter().map(row_to_playlist).collect()
}

/// Add a song to a playlist. Returns false when it was already there.
pub async fn add_song<'e>(executor: impl SqliteExecutor<'e>, playlist_id: i64, song_id: i64) -> Result<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO playlist_songs (playlist_id, song_id) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(song_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Songs of a playlist in song id order
pub async fn list_playlist_songs<'e>(executor: impl SqliteExecutor<'e>, playlist_id: i64) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.title, s.duration_seconds, s.album_id
        FROM playlist_songs ps
        JOIN songs s ON s.id = ps.song_id
        WHERE ps.playlist_id = ?
        ORDER BY s.id
        "#,
    )
    .bind(playlist_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(row_to_song).collect()
}
