//! Repository for the `games` table.

use sqlx::types::Json;
use sqlx::PgPool;
use tuneiq_core::game::GameDetails;
use tuneiq_core::types::{DbId, Timestamp};

use crate::models::game::{Game, StaleGameRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, genre, host_id, access_code, \
    intermission_duration_secs, round_duration_secs, start_time, \
    rounds, leaderboard, created_at, updated_at";

/// Provides persistence operations for games.
pub struct GameRepo;

impl GameRepo {
    /// Insert an assembled game, returning the created row.
    pub async fn create(pool: &PgPool, game: &GameDetails) -> Result<Game, sqlx::Error> {
        let query = format!(
            "INSERT INTO games (name, genre, host_id, access_code, \
                intermission_duration_secs, round_duration_secs, start_time, \
                rounds, leaderboard) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(&game.name)
            .bind(&game.genre)
            .bind(&game.host_id)
            .bind(&game.access_code)
            .bind(game.intermission_duration)
            .bind(game.round_duration)
            .bind(game.start_time)
            .bind(Json(&game.rounds))
            .bind(Json(&game.leaderboard))
            .fetch_one(pool)
            .await
    }

    /// Find a game by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List games that started at or before `cutoff`, oldest first.
    ///
    /// Games that were never started (`start_time IS NULL`) are excluded.
    pub async fn list_started_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<StaleGameRow>, sqlx::Error> {
        sqlx::query_as::<_, StaleGameRow>(
            "SELECT id, start_time FROM games \
             WHERE start_time IS NOT NULL AND start_time <= $1 \
             ORDER BY start_time, id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Set the start time of a game. Returns `false` if no row matched.
    pub async fn set_start_time(
        pool: &PgPool,
        id: DbId,
        start_time: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE games SET start_time = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(start_time)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a game. Returns `false` if no row matched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
