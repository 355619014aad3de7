use std::time::Duration;

use chrono::Utc;
use sea_orm::TransactionTrait;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{error::AppResult, services::seat_service, state::AppState};

/// Periodically expires pending bookings whose seat hold ran out, so seats
/// come back even when nobody touches that showtime again.
pub struct HoldSweeper {
    state: AppState,
    every: Duration,
}

impl HoldSweeper {
    pub fn new(state: AppState) -> Self {
        let every = Duration::from_secs(state.config.hold_sweep_seconds.max(1));
        Self { state, every }
    }

    /// One pass over every showtime; returns how many bookings were expired.
    pub async fn sweep_once(&self) -> AppResult<u64> {
        let txn = self.state.orm.begin().await?;
        let released = seat_service::release_expired_holds(&txn, None, Utc::now()).await?;
        txn.commit().await?;
        if released > 0 {
            info!(released, "expired seat holds released");
        } else {
            debug!("no expired seat holds");
        }
        Ok(released)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.sweep_once().await {
                    warn!(error = %err, "hold sweep failed");
                }
            }
        })
    }
}
