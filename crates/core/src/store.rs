//! Persistence collaborator for assembled games.
//!
//! The store handle is constructed once by the binary and injected wherever
//! it is needed; nothing in the domain layer reaches for a global.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::game::GameDetails;
use crate::types::{DbId, Timestamp};

/// A persisted game: the assembled details plus storage bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGame {
    pub id: DbId,
    #[serde(flatten)]
    pub details: GameDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal projection of a game selected for reaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleGame {
    pub id: DbId,
    pub start_time: Timestamp,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Persist a game and return its new id.
    async fn store(&self, game: &GameDetails) -> Result<DbId, CoreError>;

    /// Look up a single game.
    async fn find(&self, id: DbId) -> Result<Option<StoredGame>, CoreError>;

    /// All games whose start time is at or before `cutoff`.
    async fn query_stale(&self, cutoff: Timestamp) -> Result<Vec<StaleGame>, CoreError>;

    /// Remove one game. A missing row is reported as [`CoreError::NotFound`].
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}
