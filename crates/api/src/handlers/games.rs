//! Handlers for the `/games` resource.
//!
//! Creating a game pulls a genre-seeded track pool from the catalog, builds
//! the rounds and either stores the result or hands it straight back,
//! depending on the configured [`GameDelivery`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tuneiq_core::error::CoreError;
use tuneiq_core::game::{self, GameMetaInput};
use tuneiq_core::reaper;
use tuneiq_core::types::DbId;

use crate::config::GameDelivery;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters accepted by `POST /games`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameQuery {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub game_code: Option<String>,
    /// Older clients send the access code as `password`.
    pub password: Option<String>,
}

impl From<CreateGameQuery> for GameMetaInput {
    fn from(query: CreateGameQuery) -> Self {
        let game_code = query.game_code.filter(|code| !code.trim().is_empty());
        GameMetaInput {
            name: query.name,
            genre: query.genre,
            host_id: query.host_id,
            host_name: query.host_name,
            access_code: game_code.or(query.password),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedGame {
    pub id: DbId,
}

/// Query parameters accepted by `DELETE /games/stale`.
///
/// Kept as a raw string so a malformed value surfaces as a validation error
/// in the standard envelope rather than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReapQuery {
    pub hours_ago: Option<String>,
}

impl ReapQuery {
    fn hours(&self) -> Result<f64, CoreError> {
        let raw = self
            .hours_ago
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::Validation("hoursAgo is required".to_string()))?;

        raw.parse::<f64>().map_err(|_| {
            CoreError::Validation(format!("hoursAgo must be a positive number, got '{raw}'"))
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/games?genre=&hostId=&hostName=&name=&gameCode=
///
/// Build a new game. Returns `201 {data: {id}}` when games are persisted,
/// or `200 {data: GameDetails}` when they are returned directly.
pub async fn create_game(
    State(state): State<AppState>,
    Query(query): Query<CreateGameQuery>,
) -> AppResult<Response> {
    let meta = GameMetaInput::from(query).validate()?;
    let genre = meta.genre.clone();

    let details = game::create_game(state.catalog.as_ref(), &state.config.game, meta).await?;

    match state.config.delivery {
        GameDelivery::Persist => {
            let id = state.store.store(&details).await?;
            tracing::info!(id, genre = %genre, rounds = details.rounds.len(), "Game created");
            Ok((StatusCode::CREATED, Json(DataResponse { data: CreatedGame { id } })).into_response())
        }
        GameDelivery::Return => {
            tracing::info!(genre = %genre, rounds = details.rounds.len(), "Game assembled");
            Ok(Json(DataResponse { data: details }).into_response())
        }
    }
}

/// GET /api/v1/games/{id}
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let game = state
        .store
        .find(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Game", id }))?;
    Ok(Json(DataResponse { data: game }))
}

/// DELETE /api/v1/games/stale?hoursAgo=24
///
/// Delete every game that started at least `hoursAgo` hours ago. Individual
/// deletion failures are listed in the response body; the request itself
/// still succeeds.
pub async fn reap_stale_games(
    State(state): State<AppState>,
    Query(query): Query<ReapQuery>,
) -> AppResult<impl IntoResponse> {
    let hours = query.hours()?;

    let report = reaper::reap_stale(state.store.as_ref(), hours, Utc::now()).await?;

    for failure in &report.errors {
        tracing::warn!(id = failure.id, error = %failure.error, "Failed to delete stale game");
    }
    tracing::info!(
        hours_ago = hours,
        deleted = report.deleted_count,
        failed = report.errors.len(),
        "Stale games reaped"
    );

    Ok(Json(DataResponse { data: report }))
}
