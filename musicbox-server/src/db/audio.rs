//! Audio asset metadata persistence

use musicbox_common::db::AudioAsset;
use musicbox_common::{time, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use super::get_timestamp;

/// Audio metadata ready to be inserted
#[derive(Debug, Clone)]
pub struct NewAudioAsset {
    pub title: String,
    pub duration_seconds: i64,
    pub artist_id: i64,
    pub album_id: i64,
    pub file_path: String,
    pub original_file_name: String,
    pub size_bytes: i64,
}

fn row_to_asset(row: &SqliteRow) -> Result<AudioAsset> {
    Ok(AudioAsset {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        duration_seconds: row.try_get("duration_seconds")?,
        artist_id: row.try_get("artist_id")?,
        album_id: row.try_get("album_id")?,
        file_path: row.try_get("file_path")?,
        original_file_name: row.try_get("original_file_name")?,
        size_bytes: row.try_get("size_bytes")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}

/// Insert audio metadata
pub async fn insert_audio_asset<'e>(
    executor: impl SqliteExecutor<'e>,
    asset: &NewAudioAsset,
) -> Result<AudioAsset> {
    let created_at = time::now();

    let result = sqlx::query(
        r#"
        INSERT INTO audio_assets (
            title, duration_seconds, artist_id, album_id,
            file_path, original_file_name, size_bytes, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&asset.title)
    .bind(asset.duration_seconds)
    .bind(asset.artist_id)
    .bind(asset.album_id)
    .bind(&asset.file_path)
    .bind(&asset.original_file_name)
    .bind(asset.size_bytes)
    .bind(time::to_db(&created_at))
    .execute(executor)
    .await?;

    Ok(AudioAsset {
        id: result.last_insert_rowid(),
        title: asset.title.clone(),
        duration_seconds: asset.duration_seconds,
        artist_id: asset.artist_id,
        album_id: asset.album_id,
        file_path: asset.file_path.clone(),
        original_file_name: asset.original_file_name.clone(),
        size_bytes: asset.size_bytes,
        created_at,
    })
}

/// Load audio metadata by id
pub async fn find_audio_asset<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<AudioAsset>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, duration_seconds, artist_id, album_id,
               file_path, original_file_name, size_bytes, created_at
        FROM audio_assets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_asset).transpose()
}

/// Load all audio metadata in id order
pub async fn list_audio_assets<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<AudioAsset>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, duration_seconds, artist_id, album_id,
               file_path, original_file_name, size_bytes, created_at
        FROM audio_assets
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await?;

    rows.iter().map(row_to_asset).collect()
}
