//! Premium expiry sweeper
//!
//! Periodically clears `is_premium` for users with no subscription running
//! past the current time. Runs until its cancellation token fires.

use musicbox_common::time;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::EntitlementManager;

pub struct ExpirySweeper {
    entitlements: EntitlementManager,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(entitlements: EntitlementManager, interval_secs: u64, shutdown: CancellationToken) -> Self {
        Self {
            entitlements,
            interval_secs,
            shutdown,
        }
    }

    /// Start the sweep loop. Returns `None` when the interval is 0 (disabled).
    ///
    /// The first sweep runs immediately, which also reconciles flags left
    /// stale while the server was down.
    pub fn run(self) -> Option<JoinHandle<()>> {
        if self.interval_secs == 0 {
            info!("Expiry sweeper disabled by configuration");
            return None;
        }

        info!("Starting expiry sweeper (interval: {}s)", self.interval_secs);

        Some(tokio::spawn(async move {
            let mut timer = interval(Duration::from_secs(self.interval_secs));
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        debug!("Expiry sweeper stopping");
                        break;
                    }
                    _ = timer.tick() => {
                        if let Err(e) = self.entitlements.expire_lapsed(time::now()).await {
                            warn!("Expiry sweep failed: {}", e);
                        }
                    }
                }
            }
        }))
    }
}
