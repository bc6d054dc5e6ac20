use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;
use tuneiq_catalog::client::{DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL, DEFAULT_MIN_POPULARITY};
use tuneiq_catalog::SpotifyConfig;
use tuneiq_core::game::{GameSettings, DEFAULT_OPTIONS_PER_ROUND, DEFAULT_ROUND_COUNT};
use tuneiq_core::reaper::DEFAULT_STALE_GAME_HOURS;

/// What the create endpoint does with an assembled game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameDelivery {
    /// Store the game and answer with its id.
    Persist,
    /// Skip storage and answer with the full game.
    Return,
}

impl FromStr for GameDelivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persist" => Ok(Self::Persist),
            "return" => Ok(Self::Return),
            other => Err(format!("expected 'persist' or 'return', got '{other}'")),
        }
    }
}

/// Settings for the scheduled stale-game reaper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReaperConfig {
    /// Games that started more than this many hours ago are deleted.
    pub retention_hours: f64,
    /// Seconds between runs; `0` disables the scheduled job.
    pub interval_secs: u64,
}

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the Spotify credentials have defaults suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Shape of generated games.
    pub game: GameSettings,
    /// Persist games or hand them back directly.
    pub delivery: GameDelivery,
    /// Catalog credentials and endpoints.
    pub spotify: SpotifyConfig,
    /// Scheduled stale-game cleanup.
    pub reaper: ReaperConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                         |
    /// |---------------------------------|---------------------------------|
    /// | `HOST`                          | `0.0.0.0`                       |
    /// | `PORT`                          | `3000`                          |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                            |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `30`                            |
    /// | `GAME_ROUNDS`                   | `10`                            |
    /// | `GAME_OPTIONS_PER_ROUND`        | `4`                             |
    /// | `GAME_ALLOW_PARTIAL`            | `false`                         |
    /// | `GAME_DELIVERY`                 | `persist`                       |
    /// | `SPOTIFY_CLIENT_ID`             | required                        |
    /// | `SPOTIFY_CLIENT_SECRET`         | required                        |
    /// | `SPOTIFY_MIN_POPULARITY`        | `50`                            |
    /// | `SPOTIFY_ACCOUNTS_URL`          | `https://accounts.spotify.com`  |
    /// | `SPOTIFY_API_URL`               | `https://api.spotify.com`       |
    /// | `STALE_GAME_RETENTION_HOURS`    | `24`                            |
    /// | `STALE_GAME_REAP_INTERVAL_SECS` | `3600`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parsed(&lookup, "PORT", 3000)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    reason: format!("'{origin}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs: u64 = parsed(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let shutdown_timeout_secs: u64 = parsed(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?;

        let game = GameSettings {
            round_count: parsed(&lookup, "GAME_ROUNDS", DEFAULT_ROUND_COUNT)?,
            options_per_round: parsed(&lookup, "GAME_OPTIONS_PER_ROUND", DEFAULT_OPTIONS_PER_ROUND)?,
            allow_partial_games: parsed(&lookup, "GAME_ALLOW_PARTIAL", false)?,
        };
        game.validate().map_err(|e| ConfigError::Invalid {
            var: "GAME_ROUNDS / GAME_OPTIONS_PER_ROUND",
            reason: e.to_string(),
        })?;

        let delivery: GameDelivery = parsed(&lookup, "GAME_DELIVERY", GameDelivery::Persist)?;

        let spotify = SpotifyConfig {
            client_id: required(&lookup, "SPOTIFY_CLIENT_ID")?,
            client_secret: required(&lookup, "SPOTIFY_CLIENT_SECRET")?,
            min_popularity: parsed(&lookup, "SPOTIFY_MIN_POPULARITY", DEFAULT_MIN_POPULARITY)?,
            accounts_url: lookup("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.into()),
            api_url: lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
        };
        if spotify.min_popularity > 100 {
            return Err(ConfigError::Invalid {
                var: "SPOTIFY_MIN_POPULARITY",
                reason: "must be between 0 and 100".into(),
            });
        }

        let reaper = ReaperConfig {
            retention_hours: parsed(&lookup, "STALE_GAME_RETENTION_HOURS", DEFAULT_STALE_GAME_HOURS)?,
            interval_secs: parsed(&lookup, "STALE_GAME_REAP_INTERVAL_SECS", 3600)?,
        };
        if !reaper.retention_hours.is_finite() || reaper.retention_hours <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "STALE_GAME_RETENTION_HOURS",
                reason: "must be a positive number".into(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            game,
            delivery,
            spotify,
            reaper,
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
