//! Database access for the catalog
//!
//! Thin async functions over SQLite. Lookups take any `SqliteExecutor` so the
//! same function works against the pool or inside an open transaction
//! (`&mut *tx`).

pub mod albums;
pub mod artists;
pub mod audio;
pub mod playlists;
pub mod songs;
pub mod subscriptions;
pub mod users;

use musicbox_common::{time, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Read an RFC 3339 text column as a UTC timestamp
pub(crate) fn get_timestamp(row: &SqliteRow, column: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    let text: String = row.try_get(column)?;
    time::from_db(&text)
}
