//! Audio upload and retrieval
//!
//! Upload is `multipart/form-data` with fields:
//! - `file`: the audio bytes (its file name is kept for display)
//! - `title`
//! - `artistId`, `albumId`
//! - `duration`: whole seconds

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use musicbox_common::db::AudioAsset;

use super::parse_id;
use crate::services::AudioUpload;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default)]
struct UploadForm {
    bytes: Option<Vec<u8>>,
    file_name: Option<String>,
    title: Option<String>,
    artist_id: Option<String>,
    album_id: Option<String>,
    duration: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {}", e)))?;
                    form.bytes = Some(bytes.to_vec());
                }
                "title" | "artistId" | "albumId" | "duration" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("failed to read field {}: {}", name, e)))?;
                    match name.as_str() {
                        "title" => form.title = Some(value),
                        "artistId" => form.artist_id = Some(value),
                        "albumId" => form.album_id = Some(value),
                        _ => form.duration = Some(value),
                    }
                }
                // Unknown fields are ignored
                _ => {}
            }
        }

        Ok(form)
    }

    fn into_upload(self) -> ApiResult<AudioUpload> {
        let bytes = self
            .bytes
            .ok_or_else(|| ApiError::BadRequest("missing field: file".to_string()))?;

        Ok(AudioUpload {
            bytes,
            file_name: self.file_name.unwrap_or_default(),
            title: required(self.title, "title")?,
            artist_id: parse_number(self.artist_id, "artistId")?,
            album_id: parse_number(self.album_id, "albumId")?,
            duration_seconds: parse_number(self.duration, "duration")?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    value.ok_or_else(|| ApiError::BadRequest(format!("missing field: {}", field)))
}

fn parse_number(value: Option<String>, field: &str) -> ApiResult<i64> {
    parse_id(&required(value, field)?, field)
}

/// POST /api/audio/upload
pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<AudioAsset>)> {
    let upload = UploadForm::read(multipart).await?.into_upload()?;
    let asset = state.content.save_audio(upload).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/audio
pub async fn list_audio(State(state): State<AppState>) -> ApiResult<Json<Vec<AudioAsset>>> {
    Ok(Json(state.content.list_audio().await?))
}

/// GET /api/audio/:id
pub async fn get_audio_metadata(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<AudioAsset>> {
    let id = parse_id(&id, "audio id")?;
    Ok(Json(state.content.get_audio_metadata(id).await?))
}

/// GET /api/audio/file/:id
pub async fn get_audio_file(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "audio id")?;
    let bytes = state.content.get_audio_bytes(id).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

pub fn audio_routes() -> Router<AppState> {
    Router::new()
        .route("/api/audio/upload", post(upload_audio))
        .route("/api/audio", get(list_audio))
        .route("/api/audio/:id", get(get_audio_metadata))
        .route("/api/audio/file/:id", get(get_audio_file))
}
