//! Artist persistence

use musicbox_common::db::Artist;
use musicbox_common::Result;
use sqlx::{Row, SqliteExecutor};

/// Save a new artist
pub async fn create_artist<'e>(executor: impl SqliteExecutor<'e>, name: &str) -> Result<Artist> {
    let result = sqlx::query("INSERT INTO artists (name) VALUES (?)")
        .bind(name)
        .execute(executor)
        .await?;

    Ok(Artist {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Load artist by id
pub async fn find_artist<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Artist>> {
    let row = sqlx::query("SELECT id, name FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    match row {
        Some(row) => Ok(Some(Artist {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })),
        None => Ok(None),
    }
}
