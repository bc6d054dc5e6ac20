//! Game assembly: metadata validation, the assembled game record, and the
//! create-game flow that ties the catalog to the round builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TrackCatalog;
use crate::error::CoreError;
use crate::rounds::{build_rounds, PoolShortfall, Round};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Extra tracks requested beyond `rounds * options` to offset tracks that
/// come back without a preview clip.
pub const TRACK_POOL_PADDING: usize = 10;

/// Default number of rounds per game.
pub const DEFAULT_ROUND_COUNT: usize = 10;

/// Default number of options shown per round (answer included).
pub const DEFAULT_OPTIONS_PER_ROUND: usize = 4;

/// Maximum length of a game or host display name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a catalog genre seed.
pub const MAX_GENRE_LEN: usize = 64;

/// Maximum length of an access code.
pub const MAX_ACCESS_CODE_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Raw, unvalidated metadata as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetaInput {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub access_code: Option<String>,
}

/// Validated caller metadata for a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMeta {
    pub name: String,
    /// Lower-cased catalog genre seed, e.g. `hip-hop`.
    pub genre: String,
    pub host_id: String,
    pub host_name: String,
    pub access_code: Option<String>,
}

impl GameMetaInput {
    /// Validate and normalize the input.
    ///
    /// Required fields must be present and non-blank after trimming. The
    /// genre is lower-cased and restricted to ASCII letters, digits and `-`.
    /// A blank access code is treated as absent.
    pub fn validate(self) -> Result<GameMeta, CoreError> {
        let name = required("name", self.name, MAX_NAME_LEN)?;
        let genre = required("genre", self.genre, MAX_GENRE_LEN)?.to_ascii_lowercase();
        let host_id = required("hostId", self.host_id, MAX_NAME_LEN)?;
        let host_name = required("hostName", self.host_name, MAX_NAME_LEN)?;

        if !genre
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(CoreError::Validation(format!(
                "genre '{genre}' may only contain letters, digits and '-'"
            )));
        }

        let access_code = match self.access_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) if code.chars().count() > MAX_ACCESS_CODE_LEN => {
                return Err(CoreError::Validation(format!(
                    "access code exceeds {MAX_ACCESS_CODE_LEN} characters"
                )));
            }
            Some(code) => Some(code.to_string()),
        };

        Ok(GameMeta {
            name,
            genre,
            host_id,
            host_name,
            access_code,
        })
    }
}

fn required(field: &str, value: Option<String>, max_len: usize) -> Result<String, CoreError> {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

// ---------------------------------------------------------------------------
// Assembled game
// ---------------------------------------------------------------------------

/// A player's standing on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

/// A fully assembled game, ready to persist or hand back to the caller.
///
/// Timing fields stay unset until the lobby schedules the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    pub name: String,
    pub genre: String,
    pub host_id: String,
    pub access_code: Option<String>,
    /// Pause between rounds, in seconds.
    pub intermission_duration: Option<i32>,
    /// Length of one round, in seconds.
    pub round_duration: Option<i32>,
    pub start_time: Option<Timestamp>,
    pub rounds: Vec<Round>,
    /// Keyed by player id.
    pub leaderboard: BTreeMap<String, LeaderboardEntry>,
}

/// Merge validated metadata with built rounds.
///
/// The leaderboard starts with the host alone at score 0.
pub fn assemble_game(meta: GameMeta, rounds: Vec<Round>) -> GameDetails {
    let mut leaderboard = BTreeMap::new();
    leaderboard.insert(
        meta.host_id.clone(),
        LeaderboardEntry {
            name: meta.host_name,
            score: 0,
        },
    );

    GameDetails {
        name: meta.name,
        genre: meta.genre,
        host_id: meta.host_id,
        access_code: meta.access_code,
        intermission_duration: None,
        round_duration: None,
        start_time: None,
        rounds,
        leaderboard,
    }
}

// ---------------------------------------------------------------------------
// Create flow
// ---------------------------------------------------------------------------

/// Shape of every generated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub round_count: usize,
    pub options_per_round: usize,
    /// Accept games with missing or thin rounds instead of failing.
    pub allow_partial_games: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_count: DEFAULT_ROUND_COUNT,
            options_per_round: DEFAULT_OPTIONS_PER_ROUND,
            allow_partial_games: false,
        }
    }
}

impl GameSettings {
    /// Number of tracks to request from the catalog.
    pub fn pool_limit(&self) -> usize {
        self.round_count
            .saturating_mul(self.options_per_round)
            .saturating_add(TRACK_POOL_PADDING)
    }

    /// Check the settings before they are used for any game.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.round_count == 0 {
            return Err(CoreError::Validation(
                "round count must be at least 1".to_string(),
            ));
        }
        if self.options_per_round == 0 {
            return Err(CoreError::Validation(
                "options per round must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fetch a track pool, build the rounds and assemble the game.
///
/// Catalog failures propagate unchanged. A pool shortfall is fatal unless
/// `settings.allow_partial_games` is set; a game with no rounds at all is
/// always rejected.
pub async fn create_game(
    catalog: &dyn TrackCatalog,
    settings: &GameSettings,
    meta: GameMeta,
) -> Result<GameDetails, CoreError> {
    let pool = catalog
        .fetch_candidate_tracks(&meta.genre, settings.pool_limit())
        .await?;

    let rounds = build_rounds(&pool, settings.round_count, settings.options_per_round);

    if let Some(shortfall) =
        PoolShortfall::detect(&rounds, settings.round_count, settings.options_per_round)
    {
        if !settings.allow_partial_games || shortfall.built == 0 {
            return Err(shortfall.into());
        }
    }

    Ok(assemble_game(meta, rounds))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
