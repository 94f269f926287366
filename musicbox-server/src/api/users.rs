//! User registration and lookup
//!
//! - POST /api/users/register `{"username": "...", "email": "..."}`
//! - GET /api/users?status=ACTIVE
//! - GET /api/users/:username
//! - GET /api/users/email/:email

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use musicbox_common::db::User;
use musicbox_common::Error;
use serde::Deserialize;
use tracing::info;

use crate::db::users::{self, NewUser};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::BadRequest("username must not be empty".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::BadRequest(format!("invalid email address: {}", self.email)));
        }
        Ok(())
    }
}

/// POST /api/users/register
///
/// New users start `ACTIVE` and not premium. Duplicate username or email is
/// a 409.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    payload.validate()?;

    let user = users::register_user(
        &state.db,
        &NewUser {
            username: payload.username.trim().to_string(),
            email: payload.email.trim().to_string(),
        },
    )
    .await?;

    info!(user_id = user.id, "Registered user '{}'", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:username
pub async fn get_user(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Json<User>> {
    let user = users::find_user_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| Error::not_found("user", &username))?;

    Ok(Json(user))
}

/// GET /api/users/email/:email
pub async fn get_user_by_email(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Json<User>> {
    let user = users::find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| Error::not_found("user", &email))?;

    Ok(Json(user))
}

/// GET /api/users?status=ACTIVE
///
/// `status` is required; an unknown status yields an empty list.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<Vec<User>>> {
    let status = params
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing status".to_string()))?;

    Ok(Json(users::list_users_by_status(&state.db, status.trim()).await?))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/register", post(register))
        .route("/api/users/:username", get(get_user))
        .route("/api/users/email/:email", get(get_user_by_email))
}
