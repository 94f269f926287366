//! Artist, album and song endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use musicbox_common::db::{Album, Artist, Song};
use musicbox_common::Error;
use serde::Deserialize;
use tracing::info;

use super::parse_id;
use crate::db::{albums, artists, songs};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    pub artist_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    pub title: String,
    #[serde(default)]
    pub duration_seconds: i64,
    pub album_id: i64,
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<AppState>,
    Json(payload): Json<CreateArtistRequest>,
) -> ApiResult<(StatusCode, Json<Artist>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("artist name must not be empty".to_string()));
    }

    let artist = artists::create_artist(&state.db, name).await?;
    info!(artist_id = artist.id, "Created artist '{}'", artist.name);

    Ok((StatusCode::CREATED, Json(artist)))
}

/// GET /api/artists/:id
pub async fn get_artist(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Artist>> {
    let id = parse_id(&id, "artist id")?;
    let artist = artists::find_artist(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("artist", id))?;
    Ok(Json(artist))
}

/// POST /api/albums
///
/// The referenced artist must exist (404 otherwise).
pub async fn create_album(
    State(state): State<AppState>,
    Json(payload): Json<CreateAlbumRequest>,
) -> ApiResult<(StatusCode, Json<Album>)> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("album title must not be empty".to_string()));
    }

    if artists::find_artist(&state.db, payload.artist_id).await?.is_none() {
        return Err(Error::not_found("artist", payload.artist_id).into());
    }

    let album = albums::create_album(&state.db, title, payload.release_year, payload.artist_id).await?;
    info!(album_id = album.id, artist_id = album.artist_id, "Created album '{}'", album.title);

    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /api/albums/:id
pub async fn get_album(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Album>> {
    let id = parse_id(&id, "album id")?;
    let album = albums::find_album(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("album", id))?;
    Ok(Json(album))
}

/// GET /api/albums/:id/songs
pub async fn get_album_songs(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Song>>> {
    let id = parse_id(&id, "album id")?;
    if albums::find_album(&state.db, id).await?.is_none() {
        return Err(Error::not_found("album", id).into());
    }
    Ok(Json(songs::list_songs_by_album(&state.db, id).await?))
}

/// POST /api/songs
///
/// The referenced album must exist (404 otherwise).
pub async fn create_song(
    State(state): State<AppState>,
    Json(payload): Json<CreateSongRequest>,
) -> ApiResult<(StatusCode, Json<Song>)> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("song title must not be empty".to_string()));
    }
    if payload.duration_seconds < 0 {
        return Err(ApiError::BadRequest(format!(
            "duration must not be negative: {}",
            payload.duration_seconds
        )));
    }

    if albums::find_album(&state.db, payload.album_id).await?.is_none() {
        return Err(Error::not_found("album", payload.album_id).into());
    }

    let song = songs::create_song(&state.db, title, payload.duration_seconds, payload.album_id).await?;
    info!(song_id = song.id, album_id = song.album_id, "Created song '{}'", song.title);

    Ok((StatusCode::CREATED, Json(song)))
}

/// GET /api/songs/:id
pub async fn get_song(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Song>> {
    let id = parse_id(&id, "song id")?;
    let song = songs::find_song(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("song", id))?;
    Ok(Json(song))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/artists", post(create_artist))
        .route("/api/artists/:id", get(get_artist))
        .route("/api/albums", post(create_album))
        .route("/api/albums/:id", get(get_album))
        .route("/api/albums/:id/songs", get(get_album_songs))
        .route("/api/songs", post(create_song))
        .route("/api/songs/:id", get(get_song))
}
