//! Shared fixtures for integration tests

#![allow(dead_code)]

use musicbox_common::db::{init_memory_database, Album, Artist, User};
use musicbox_server::db::users::{register_user, NewUser};
use musicbox_server::db::{albums, artists};
use sqlx::SqlitePool;

pub async fn memory_pool() -> SqlitePool {
    init_memory_database().await.unwrap()
}

pub async fn user(pool: &SqlitePool, username: &str) -> User {
    register_user(
        pool,
        &NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
        },
    )
    .await
    .unwrap()
}

pub async fn artist_and_album(pool: &SqlitePool) -> (Artist, Album) {
    let artist = artists::create_artist(pool, "The Testers").await.unwrap();
    let album = albums::create_album(pool, "First Light", Some(2021), artist.id)
        .await
        .unwrap();
    (artist, album)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Names of everything directly inside `dir` (empty when `dir` is missing)
pub fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}
