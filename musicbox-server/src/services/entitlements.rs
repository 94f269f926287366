//! Entitlement manager
//!
//! Owns subscription creation and premium-status evaluation. Premium status
//! is the denormalized `users.is_premium` flag:
//! - false → true when a subscription is created
//! - true → false when the expiry sweep finds no subscription running past now

use chrono::{DateTime, Utc};
use musicbox_common::db::Subscription;
use musicbox_common::{time, Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db;

#[derive(Clone)]
pub struct EntitlementManager {
    db: SqlitePool,
}

impl EntitlementManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Start a subscription for `user_id` running from now until `end_date`
    ///
    /// The user's premium flag and the new subscription row are written in
    /// one transaction: on any failure neither is applied. `end_date` is not
    /// checked against the current time.
    ///
    /// The flag UPDATE must stay the first statement of the transaction: a
    /// read before it pins a WAL snapshot, and the lock upgrade then fails
    /// with SQLITE_BUSY if another writer committed in between.
    pub async fn create_subscription(&self, user_id: i64, end_date: DateTime<Utc>) -> Result<Subscription> {
        let mut tx = self.db.begin().await?;

        // Unknown user: NotFound, and dropping `tx` rolls back
        db::users::set_premium(&mut *tx, user_id, true).await?;

        let start_date = time::now();
        let subscription = db::subscriptions::insert_subscription(&mut *tx, user_id, start_date, end_date).await?;

        tx.commit().await?;

        info!(
            user_id,
            subscription_id = subscription.id,
            end_date = %subscription.end_date,
            "Subscription created"
        );

        Ok(subscription)
    }

    /// Current premium flag of `user_id`
    pub async fn is_premium_user(&self, user_id: i64) -> Result<bool> {
        let user = db::users::find_user(&self.db, user_id)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;

        debug!(user_id, is_premium = user.is_premium, "Premium status checked");

        Ok(user.is_premium)
    }

    /// Subscription history of `user_id`, newest first
    pub async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        if db::users::find_user(&self.db, user_id).await?.is_none() {
            return Err(Error::not_found("user", user_id));
        }

        db::subscriptions::list_for_user(&self.db, user_id).await
    }

    /// Downgrade users whose subscriptions have all ended by `now`
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<u64> {
        let downgraded = db::subscriptions::expire_lapsed(&self.db, now).await?;

        if downgraded > 0 {
            info!(downgraded, "Expired lapsed premium users");
        } else {
            debug!("Expiry sweep found no lapsed premium users");
        }

        Ok(downgraded)
    }
}
