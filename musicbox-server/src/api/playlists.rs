//! Playlist endpoints
//!
//! - POST /api/playlists `{"name": "...", "userId": 1}`
//! - GET /api/playlists/:id (with its songs)
//! - GET /api/playlists/user/:user_id
//! - POST /api/playlists/:id/songs/:song_id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use musicbox_common::db::{Playlist, Song};
use musicbox_common::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parse_id;
use crate::db::{playlists, songs, users};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub user_id: i64,
}

/// A playlist together with its songs
#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub songs: Vec<Song>,
}

async fn load_playlist(state: &AppState, id: i64) -> ApiResult<PlaylistResponse> {
    let playlist = playlists::find_playlist(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("playlist", id))?;
    let songs = playlists::list_playlist_songs(&state.db, id).await?;
    Ok(PlaylistResponse { playlist, songs })
}

/// POST /api/playlists
///
/// The owner must exist (404 otherwise). New playlists are empty.
pub async fn create_playlist(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlaylistRequest>,
) -> ApiResult<(StatusCode, Json<PlaylistResponse>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("playlist name must not be empty".to_string()));
    }

    if users::find_user(&state.db, payload.user_id).await?.is_none() {
        return Err(Error::not_found("user", payload.user_id).into());
    }

    let playlist = playlists::create_playlist(&state.db, name, payload.user_id).await?;
    info!(playlist_id = playlist.id, user_id = playlist.user_id, "Created playlist '{}'", playlist.name);

    Ok((
        StatusCode::CREATED,
        Json(PlaylistResponse {
            playlist,
            songs: Vec::new(),
        }),
    ))
}

/// GET /api/playlists/:id
pub async fn get_playlist(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<PlaylistResponse>> {
    let id = parse_id(&id, "playlist id")?;
    Ok(Json(load_playlist(&state, id).await?))
}

/// GET /api/playlists/user/:user_id
pub async fn user_playlists(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Json<Vec<Playlist>>> {
    let user_id = parse_id(&user_id, "user id")?;
    if users::find_user(&state.db, user_id).await?.is_none() {
        return Err(Error::not_found("user", user_id).into());
    }
    Ok(Json(playlists::list_playlists_by_user(&state.db, user_id).await?))
}

/// POST /api/playlists/:id/songs/:song_id
///
/// Adding a song already in the playlist succeeds without change.
pub async fn add_song(
    State(state): State<AppState>,
    Path((id, song_id)): Path<(String, String)>,
) -> ApiResult<Json<PlaylistResponse>> {
    let id = parse_id(&id, "playlist id")?;
    let song_id = parse_id(&song_id, "song id")?;

    if playlists::find_playlist(&state.db, id).await?.is_none() {
        return Err(Error::not_found("playlist", id).into());
    }
    if songs::find_song(&state.db, song_id).await?.is_none() {
        return Err(Error::not_found("song", song_id).into());
    }

    if playlists::add_song(&state.db, id, song_id).await? {
        info!(playlist_id = id, song_id, "Added song to playlist");
    } else {
        debug!(playlist_id = id, song_id, "Song already in playlist");
    }

    Ok(Json(load_playlist(&state, id).await?))
}

pub fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/api/playlists", post(create_playlist))
        .route("/api/playlists/:id", get(get_playlist))
        .route("/api/playlists/user/:user_id", get(user_playlists))
        .route("/api/playlists/:id/songs/:song_id", post(add_song))
}
