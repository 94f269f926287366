//! Song persistence

use musicbox_common::db::Song;
use musicbox_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

pub(crate) fn row_to_song(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        duration_seconds: row.try_get("duration_seconds")?,
        album_id: row.try_get("album_id")?,
    })
}

/// Save a new song. The album must already exist (foreign key).
pub async fn create_song<'e>(
    executor: impl SqliteExecutor<'e>,
    title: &str,
    duration_seconds: i64,
    album_id: i64,
) -> Result<Song> {
    let result = sqlx::query("INSERT INTO songs (title, duration_seconds, album_id) VALUES (?, ?, ?)")
        .bind(title)
        .bind(duration_seconds)
        .bind(album_id)
        .execute(executor)
        .await?;

    Ok(Song {
        id: result.last_insert_rowid(),
        title: title.to_string(),
        duration_seconds,
        album_id,
    })
}

pub async fn find_song<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Song>> {
    let row = sqlx::query("SELECT id, title, duration_seconds, album_id FROM songs WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(row_to_song).transpose()
}

/// Tracks of one album in id order
pub async fn list_songs_by_album<'e>(executor: impl SqliteExecutor<'e>, album_id: i64) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, duration_seconds, album_id
        FROM songs
        WHERE album_id = ?
        ORDER BY id
        "#,
    )
    .bind(album_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(row_to_song).collect()
}
