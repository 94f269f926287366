//! Subscription persistence
//!
//! Subscriptions are insert-only history rows. The only bulk operation is the
//! expiry sweep, which touches `users`, never `subscriptions`.

use chrono::{DateTime, Utc};
use musicbox_common::db::Subscription;
use musicbox_common::{time, Result};
use sqlx::{Row, SqliteExecutor};

use super::get_timestamp;

/// Insert a subscription row
pub async fn insert_subscription<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<Subscription> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (user_id, start_date, end_date)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(time::to_db(&start_date))
    .bind(time::to_db(&end_date))
    .execute(executor)
    .await?;

    Ok(Subscription {
        id: result.last_insert_rowid(),
        user_id,
        start_date,
        end_date,
    })
}

/// All subscriptions of a user, newest first
pub async fn list_for_user<'e>(executor: impl SqliteExecutor<'e>, user_id: i64) -> Result<Vec<Subscription>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, start_date, end_date
        FROM subscriptions
        WHERE user_id = ?
        ORDER BY start_date DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    let mut subscriptions = Vec::with_capacity(rows.len());
    for row in rows {
        subscriptions.push(Subscription {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            start_date: get_timestamp(&row, "start_date")?,
            end_date: get_timestamp(&row, "end_date")?,
        });
    }

    Ok(subscriptions)
}

/// Clear the premium flag of every user without a subscription running past `now`
///
/// Returns the number of users downgraded.
pub async fn expire_lapsed<'e>(executor: impl SqliteExecutor<'e>, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_premium = 0
        WHERE is_premium = 1
          AND NOT EXISTS (
              SELECT 1 FROM subscriptions s
              WHERE s.user_id = users.id AND s.end_date > ?
          )
        "#,
    )
    .bind(time::to_db(&now))
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
