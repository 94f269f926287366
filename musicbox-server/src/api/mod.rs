//! HTTP API handlers
//!
//! Thin layer over the services: parse and validate the request, call one
//! service operation, serialize the result. JSON field names are camelCase.

pub mod audio;
pub mod catalog;
pub mod health;
pub mod playlists;
pub mod subscriptions;
pub mod users;

pub use audio::audio_routes;
pub use catalog::catalog_routes;
pub use health::health_routes;
pub use playlists::playlist_routes;
pub use subscriptions::subscription_routes;
pub use users::user_routes;

use crate::{ApiError, ApiResult};

/// Parse a numeric id taken from the path or query string
///
/// Handlers extract ids as text so a malformed value gets the JSON error
/// envelope instead of axum's plain-text rejection.
pub(crate) fn parse_id(value: &str, name: &str) -> ApiResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid {}: {:?} ({})", name, value, e)))
}
