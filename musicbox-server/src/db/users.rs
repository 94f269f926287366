//! User persistence
//!
//! Registration and lookups. The entitlement manager only ever touches the
//! `is_premium` flag through [`set_premium`].

use musicbox_common::db::{User, USER_STATUS_ACTIVE};
use musicbox_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use super::get_timestamp;

/// Registration input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        status: row.try_get("status")?,
        is_premium: row.try_get("is_premium")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}

/// Register a new, non-premium, `ACTIVE` user
pub async fn register_user<'e>(executor: impl SqliteExecutor<'e>, new_user: &NewUser) -> Result<User> {
    let created_at = time::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, status, is_premium, created_at)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(USER_STATUS_ACTIVE)
    .bind(time::to_db(&created_at))
    .execute(executor)
    .await?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: new_user.username.clone(),
        email: new_user.email.clone(),
        status: USER_STATUS_ACTIVE.to_string(),
        is_premium: false,
        created_at,
    })
}

/// Load user by id
pub async fn find_user<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, status, is_premium, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Load user by username
pub async fn find_user_by_username<'e>(
    executor: impl SqliteExecutor<'e>,
    username: &str,
) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, status, is_premium, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Load user by email
pub async fn find_user_by_email<'e>(executor: impl SqliteExecutor<'e>, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, status, is_premium, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// All users with the given status, in id order
pub async fn list_users_by_status<'e>(executor: impl SqliteExecutor<'e>, status: &str) -> Result<Vec<User>> {
    let rows = sqlx::query(
        r#"
        SELECT id, username, email, status, is_premium, created_at
        FROM users
        WHERE status = ?
        ORDER BY id
        "#,
    )
    .bind(status)
    .fetch_all(executor)
    .await?;

    rows.iter().map(row_to_user).collect()
}

/// Set the premium flag of one user
///
/// A single UPDATE, so inside a transaction it takes the write lock as its
/// first statement. Unknown ids are `NotFound`.
pub async fn set_premium<'e>(executor: impl SqliteExecutor<'e>, id: i64, is_premium: bool) -> Result<()> {
    let result = sqlx::query("UPDATE users SET is_premium = ? WHERE id = ?")
        .bind(is_premium)
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("user", id));
    }

    Ok(())
}
