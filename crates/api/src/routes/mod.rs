pub mod games;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /games                 create (POST)
/// /games/stale           reap stale games (DELETE)
/// /games/{id}            get (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/games", games::router())
}
