//! Game entity model.

use std::collections::BTreeMap;

use sqlx::types::Json;
use sqlx::FromRow;
use tuneiq_core::game::{GameDetails, LeaderboardEntry};
use tuneiq_core::rounds::Round;
use tuneiq_core::store::{StaleGame, StoredGame};
use tuneiq_core::types::{DbId, Timestamp};

/// A row from the `games` table.
#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub id: DbId,
    pub name: String,
    pub genre: String,
    pub host_id: String,
    pub access_code: Option<String>,
    pub intermission_duration_secs: Option<i32>,
    pub round_duration_secs: Option<i32>,
    pub start_time: Option<Timestamp>,
    pub rounds: Json<Vec<Round>>,
    pub leaderboard: Json<BTreeMap<String, LeaderboardEntry>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Game> for StoredGame {
    fn from(row: Game) -> Self {
        StoredGame {
            id: row.id,
            details: GameDetails {
                name: row.name,
                genre: row.genre,
                host_id: row.host_id,
                access_code: row.access_code,
                intermission_duration: row.intermission_duration_secs,
                round_duration: row.round_duration_secs,
                start_time: row.start_time,
                rounds: row.rounds.0,
                leaderboard: row.leaderboard.0,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `(id, start_time)` projection used when selecting games to reap.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StaleGameRow {
    pub id: DbId,
    pub start_time: Timestamp,
}

impl From<StaleGameRow> for StaleGame {
    fn from(row: StaleGameRow) -> Self {
        StaleGame {
            id: row.id,
            start_time: row.start_time,
        }
    }
}
