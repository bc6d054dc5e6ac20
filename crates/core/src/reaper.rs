//! Stale game reaping.
//!
//! Deletes every persisted game that started at least a given number of
//! hours ago. Deletions run concurrently and settle independently: one
//! failure never aborts or rolls back the others, and the report lists each
//! failure next to its game id. There is no atomicity across the batch.

use futures::future::join_all;
use serde::Serialize;

use crate::error::CoreError;
use crate::store::GameStore;
use crate::types::{DbId, Timestamp};

/// Default age threshold used by the scheduled reaper.
pub const DEFAULT_STALE_GAME_HOURS: f64 = 24.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A deletion that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDeletion {
    pub id: DbId,
    pub error: String,
}

/// Outcome of one reaper invocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReapReport {
    pub deleted_count: usize,
    pub errors: Vec<FailedDeletion>,
}

impl ReapReport {
    /// Fold per-game outcomes into a report, keeping failures in input order.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (DbId, Result<(), CoreError>)>,
    {
        let mut report = Self::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.deleted_count += 1,
                Err(e) => report.errors.push(FailedDeletion {
                    id,
                    error: e.to_string(),
                }),
            }
        }
        report
    }
}

/// Compute the start-time cutoff for games older than `hours_ago`.
///
/// `hours_ago` must be a finite number greater than zero.
pub fn stale_cutoff(now: Timestamp, hours_ago: f64) -> Result<Timestamp, CoreError> {
    if !hours_ago.is_finite() || hours_ago <= 0.0 {
        return Err(CoreError::Validation(format!(
            "hoursAgo must be a positive number, got {hours_ago}"
        )));
    }

    let millis = (hours_ago * MILLIS_PER_HOUR).round() as i64;
    chrono::Duration::try_milliseconds(millis)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| CoreError::Validation(format!("hoursAgo {hours_ago} is out of range")))
}

/// Delete every game whose start time is at or before `now - hours_ago`.
///
/// Invalid input is rejected before the store is touched. A failing query
/// propagates as an error; failing deletions are collected in the report.
pub async fn reap_stale(
    store: &dyn GameStore,
    hours_ago: f64,
    now: Timestamp,
) -> Result<ReapReport, CoreError> {
    let cutoff = stale_cutoff(now, hours_ago)?;

    let stale = store.query_stale(cutoff).await?;
    if stale.is_empty() {
        return Ok(ReapReport::default());
    }

    let outcomes = join_all(
        stale
            .iter()
            .map(|game| async move { (game.id, store.delete(game.id).await) }),
    )
    .await;

    Ok(ReapReport::from_outcomes(outcomes))
}
