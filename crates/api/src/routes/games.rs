//! Route definitions for games.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

/// Routes mounted at `/games`.
///
/// ```text
/// POST   /         -> create_game
/// DELETE /stale    -> reap_stale_games
/// GET    /{id}     -> get_game
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(games::create_game))
        .route("/stale", delete(games::reap_stale_games))
        .route("/{id}", get(games::get_game))
}
