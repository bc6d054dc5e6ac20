//! Periodic cleanup of stale games.
//!
//! Runs the same reaper as `DELETE /api/v1/games/stale` on a fixed
//! interval, using the configured retention window.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tuneiq_core::reaper;
use tuneiq_core::store::GameStore;

use crate::config::ReaperConfig;

/// Run the stale game cleanup loop until `cancel` is triggered.
///
/// The first pass runs immediately. A failed pass is logged and retried on
/// the next tick.
pub async fn run(store: Arc<dyn GameStore>, config: ReaperConfig, cancel: CancellationToken) {
    let period = Duration::from_secs(config.interval_secs.max(1));

    tracing::info!(
        retention_hours = config.retention_hours,
        interval_secs = period.as_secs(),
        "Stale game reaper started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stale game reaper stopping");
                break;
            }
            _ = interval.tick() => {
                match reaper::reap_stale(store.as_ref(), config.retention_hours, Utc::now()).await {
                    Ok(report) => {
                        for failure in &report.errors {
                            tracing::warn!(id = failure.id, error = %failure.error, "Stale game reaper: delete failed");
                        }
                        if report.deleted_count > 0 {
                            tracing::info!(deleted = report.deleted_count, "Stale game reaper: purged games");
                        } else {
                            tracing::debug!("Stale game reaper: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Stale game reaper: run failed");
                    }
                }
            }
        }
    }
}
