//! Catalog records
//!
//! Row ids are assigned by SQLite. JSON field names are camelCase to match
//! the public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User status assigned at registration
pub const USER_STATUS_ACTIVE: &str = "ACTIVE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub status: String,
    /// Denormalized entitlement flag, set by subscription creation and
    /// cleared by the expiry sweep
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub release_year: Option<i32>,
    pub artist_id: i64,
}

/// A track on an album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub duration_seconds: i64,
    pub album_id: i64,
}

/// A user's named collection of songs. Membership lives in `playlist_songs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

/// One premium period for a user. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Metadata for an uploaded audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAsset {
    pub id: i64,
    pub title: String,
    pub duration_seconds: i64,
    pub artist_id: i64,
    pub album_id: i64,
    /// Opaque handle into the content store's upload area
    pub file_path: String,
    /// Name the file was uploaded under (display only)
    pub original_file_name: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}
