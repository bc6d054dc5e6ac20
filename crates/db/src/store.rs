//! [`GameStore`] backed by Postgres.

use async_trait::async_trait;
use tuneiq_core::error::CoreError;
use tuneiq_core::game::GameDetails;
use tuneiq_core::store::{GameStore, StaleGame, StoredGame};
use tuneiq_core::types::{DbId, Timestamp};

use crate::repositories::GameRepo;
use crate::DbPool;

/// Postgres implementation of the game store.
///
/// Holds the process-wide pool handed over at construction; clones share
/// the same pool.
#[derive(Debug, Clone)]
pub struct PgGameStore {
    pool: DbPool,
}

impl PgGameStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a database failure to the domain's upstream error.
fn upstream(op: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, op, "Game store query failed");
    CoreError::Upstream(format!("{op}: {err}"))
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn store(&self, game: &GameDetails) -> Result<DbId, CoreError> {
        let row = GameRepo::create(&self.pool, game)
            .await
            .map_err(|e| upstream("store game", e))?;
        Ok(row.id)
    }

    async fn find(&self, id: DbId) -> Result<Option<StoredGame>, CoreError> {
        let row = GameRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| upstream("find game", e))?;
        Ok(row.map(StoredGame::from))
    }

    async fn query_stale(&self, cutoff: Timestamp) -> Result<Vec<StaleGame>, CoreError> {
        let rows = GameRepo::list_started_before(&self.pool, cutoff)
            .await
            .map_err(|e| upstream("query stale games", e))?;
        Ok(rows.into_iter().map(StaleGame::from).collect())
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = GameRepo::delete(&self.pool, id)
            .await
            .map_err(|e| upstream("delete game", e))?;
        if deleted {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity: "Game", id })
        }
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| upstream("health check", e))
    }
}
