//! Subscription endpoints
//!
//! - POST /api/subscriptions/create?userId=1&endDate=2026-01-01T00:00:00Z
//! - GET /api/subscriptions/premium-status/:user_id
//! - GET /api/subscriptions/user/:user_id

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use musicbox_common::db::Subscription;
use musicbox_common::time;
use serde::Deserialize;

use super::parse_id;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters are taken as text so that a bad value yields a JSON 400
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionParams {
    pub user_id: Option<String>,
    pub end_date: Option<String>,
}

/// POST /api/subscriptions/create
pub async fn create_subscription(
    State(state): State<AppState>,
    Query(params): Query<CreateSubscriptionParams>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let user_id = params
        .user_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing userId".to_string()))?;
    let user_id = parse_id(user_id, "userId")?;

    let end_date = params
        .end_date
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing endDate".to_string()))?;
    let end_date = time::parse_rfc3339(end_date)?;

    let subscription = state.entitlements.create_subscription(user_id, end_date).await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /api/subscriptions/premium-status/:user_id
///
/// Responds with a bare JSON boolean.
pub async fn premium_status(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Json<bool>> {
    let user_id = parse_id(&user_id, "user id")?;
    Ok(Json(state.entitlements.is_premium_user(user_id).await?))
}

/// GET /api/subscriptions/user/:user_id (newest first)
pub async fn user_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let user_id = parse_id(&user_id, "user id")?;
    Ok(Json(state.entitlements.list_subscriptions(user_id).await?))
}

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/api/subscriptions/create", post(create_subscription))
        .route("/api/subscriptions/premium-status/:user_id", get(premium_status))
        .route("/api/subscriptions/user/:user_id", get(user_subscriptions))
}
