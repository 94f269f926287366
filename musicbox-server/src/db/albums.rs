//! Album persistence

use musicbox_common::db::Album;
use musicbox_common::Result;
use sqlx::{Row, SqliteExecutor};

/// Save a new album. The artist must already exist (foreign key).
pub async fn create_album<'e>(
    executor: impl SqliteExecutor<'e>,
    title: &str,
    release_year: Option<i32>,
    artist_id: i64,
) -> Result<Album> {
    let result = sqlx::query("INSERT INTO albums (title, release_year, artist_id) VALUES (?, ?, ?)")
        .bind(title)
        .bind(release_year)
        .bind(artist_id)
        .execute(executor)
        .await?;

    Ok(Album {
        id: result.last_insert_rowid(),
        title: title.to_string(),
        release_year,
        artist_id,
    })
}

/// Load album by id
pub async fn find_album<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Album>> {
    let row = sqlx::query("SELECT id, title, release_year, artist_id FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    match row {
        Some(row) => Ok(Some(Album {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            release_year: row.try_get("release_year")?,
            artist_id: row.try_get("artist_id")?,
        })),
        None => Ok(None),
    }
}
